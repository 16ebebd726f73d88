use super::{Connector, LayoutKind, LayoutOptions, Link, PlacedNode, TreeLayout};
use crate::tree::{LifeTree, NodeKind, NodePath, Side};
use egui::pos2;

const DEPTH_SPACING: f32 = 180.0;
const SIBLING_GAP: f32 = 1.0;
const COUSIN_GAP: f32 = 2.0;
const CANVAS_MARGIN: f32 = 200.0;

struct Visible {
    path: NodePath,
    kind: NodeKind,
    depth: usize,
    has_hidden: bool,
    children: Vec<Visible>,
}

/// Top-down layout: x by leaf order, y by depth. Collapsed nodes keep
/// their position but hide their subtree.
pub(super) fn build(tree: &LifeTree, options: &LayoutOptions) -> TreeLayout {
    let root = visible_tree(tree, options);

    let mut xs = Vec::new();
    let mut last_leaf: Option<(f32, Option<NodePath>)> = None;
    assign_x(&root, None, &mut last_leaf, &mut xs);

    let (min, max) = xs
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), (_, x)| {
            (lo.min(*x), hi.max(*x))
        });
    let usable = (options.canvas_width - CANVAS_MARGIN).max(0.0);
    let scale = if max > min { usable / (max - min) } else { 0.0 };
    let trunk_x = xs
        .iter()
        .find(|(path, _)| *path == NodePath::Trunk)
        .map(|(_, x)| *x)
        .unwrap_or(0.0);
    let world_x = |raw: f32| (raw - trunk_x) * scale;

    let mut layout = TreeLayout {
        kind: LayoutKind::Hierarchy,
        nodes: Vec::new(),
        links: Vec::new(),
        node_radius: 0.0,
    };
    emit(&root, None, &xs, &world_x, &mut layout);
    layout
}

fn visible_tree(tree: &LifeTree, options: &LayoutOptions) -> Visible {
    let trunk_hidden = options.collapsed.contains(&NodePath::Trunk);
    let mut children = Vec::new();
    if !trunk_hidden {
        for side in [Side::Roots, Side::Branches] {
            for (index, node) in tree.side(side).iter().enumerate() {
                let path = NodePath::Primary { side, index };
                let hidden = options.collapsed.contains(&path);
                let grandchildren = if hidden {
                    Vec::new()
                } else {
                    node.children
                        .iter()
                        .enumerate()
                        .map(|(child, child_node)| Visible {
                            path: NodePath::Secondary {
                                side,
                                parent: index,
                                index: child,
                            },
                            kind: child_node.kind,
                            depth: 2,
                            has_hidden: false,
                            children: Vec::new(),
                        })
                        .collect()
                };
                children.push(Visible {
                    path,
                    kind: node.kind,
                    depth: 1,
                    has_hidden: hidden && !node.children.is_empty(),
                    children: grandchildren,
                });
            }
        }
    }
    Visible {
        path: NodePath::Trunk,
        kind: tree.trunk.kind,
        depth: 0,
        has_hidden: trunk_hidden && (!tree.roots.is_empty() || !tree.branches.is_empty()),
        children,
    }
}

fn assign_x(
    node: &Visible,
    parent: Option<NodePath>,
    last_leaf: &mut Option<(f32, Option<NodePath>)>,
    xs: &mut Vec<(NodePath, f32)>,
) -> f32 {
    let x = if node.children.is_empty() {
        let x = match *last_leaf {
            None => 0.0,
            Some((prev, prev_parent)) if prev_parent == parent => prev + SIBLING_GAP,
            Some((prev, _)) => prev + COUSIN_GAP,
        };
        *last_leaf = Some((x, parent));
        x
    } else {
        let child_xs: Vec<f32> = node
            .children
            .iter()
            .map(|child| assign_x(child, Some(node.path), last_leaf, xs))
            .collect();
        let first = child_xs.first().copied().unwrap_or(0.0);
        let last = child_xs.last().copied().unwrap_or(first);
        (first + last) / 2.0
    };
    xs.push((node.path, x));
    x
}

fn emit(
    node: &Visible,
    parent: Option<egui::Pos2>,
    xs: &[(NodePath, f32)],
    world_x: &dyn Fn(f32) -> f32,
    layout: &mut TreeLayout,
) {
    let raw = xs
        .iter()
        .find(|(path, _)| *path == node.path)
        .map(|(_, x)| *x)
        .unwrap_or(0.0);
    let pos = pos2(world_x(raw), node.depth as f32 * DEPTH_SPACING);
    layout.nodes.push(PlacedNode {
        path: node.path,
        kind: node.kind,
        pos,
        level: node.depth,
        collapsed: node.has_hidden,
    });
    if let (Some(from), Some(parent_path)) = (parent, node.path.parent()) {
        layout.links.push(Link {
            parent: parent_path,
            child: node.path,
            connector: Connector::Diagonal { from, to: pos },
        });
    }
    for child in &node.children {
        emit(child, Some(pos), xs, world_x, layout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeNode;
    use std::collections::HashSet;

    fn options(collapsed: &[NodePath]) -> LayoutOptions {
        LayoutOptions {
            canvas_width: 1200.0,
            node_radius: 30.0,
            collapsed: collapsed.iter().copied().collect::<HashSet<_>>(),
        }
    }

    fn small_tree() -> LifeTree {
        let mut root = TreeNode::new("Root", NodeKind::Roots, "");
        root.children = vec![
            TreeNode::new("Deep A", NodeKind::DeepRoots, ""),
            TreeNode::new("Deep B", NodeKind::DeepRoots, ""),
        ];
        LifeTree {
            trunk: TreeNode::new("Trunk", NodeKind::Trunk, ""),
            roots: vec![root],
            branches: vec![TreeNode::new("Branch", NodeKind::Branch, "")],
        }
    }

    #[test]
    fn depth_sets_the_vertical_position() {
        let layout = build(&small_tree(), &options(&[]));
        for node in &layout.nodes {
            assert_eq!(node.pos.y, node.level as f32 * DEPTH_SPACING);
        }
        assert_eq!(layout.node(NodePath::Trunk).map(|node| node.pos.x), Some(0.0));
    }

    #[test]
    fn cousins_are_spaced_wider_than_siblings() {
        let layout = build(&small_tree(), &options(&[]));
        let x = |path: NodePath| layout.node(path).map(|node| node.pos.x).unwrap_or(f32::NAN);
        let a = x(NodePath::root(0).child(0).expect("child path"));
        let b = x(NodePath::root(0).child(1).expect("child path"));
        let branch = x(NodePath::branch(0));
        assert!((b - a) > 0.0);
        assert!(((branch - b) - 2.0 * (b - a)).abs() < 1e-2);
        // Leaves span the usable canvas width.
        assert!(((branch - a) - 1000.0).abs() < 1e-2);
    }

    #[test]
    fn collapsed_nodes_hide_their_children() {
        let layout = build(&small_tree(), &options(&[NodePath::root(0)]));
        assert_eq!(layout.nodes.len(), 3);
        let root = layout.node(NodePath::root(0)).expect("root placed");
        assert!(root.collapsed);
        assert!(layout
            .links
            .iter()
            .all(|link| link.child.level() == 1));

        let trunk_only = build(&small_tree(), &options(&[NodePath::Trunk]));
        assert_eq!(trunk_only.nodes.len(), 1);
        assert!(trunk_only.nodes[0].collapsed);
        assert_eq!(trunk_only.nodes[0].pos, pos2(0.0, 0.0));
    }
}
