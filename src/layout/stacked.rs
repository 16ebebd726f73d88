use super::{centred_offsets, Connector, LayoutKind, Link, PlacedNode, TreeLayout};
use crate::tree::{LifeTree, NodePath, Side, TreeNode};
use egui::pos2;

/// Distances for one side of a stacked layout. `offset` values are signed:
/// roots grow towards positive y, branches towards negative y.
pub(super) struct SideSpacing {
    pub primary_spacing: f32,
    pub primary_offset: f32,
    pub child_spacing: f32,
    pub child_offset: f32,
}

pub(super) struct Spacing {
    pub kind: LayoutKind,
    pub roots: SideSpacing,
    pub branches: SideSpacing,
}

pub(super) const VERTICAL: Spacing = Spacing {
    kind: LayoutKind::Vertical,
    roots: SideSpacing {
        primary_spacing: 160.0,
        primary_offset: 140.0,
        child_spacing: 100.0,
        child_offset: 120.0,
    },
    branches: SideSpacing {
        primary_spacing: 140.0,
        primary_offset: -140.0,
        child_spacing: 90.0,
        child_offset: -100.0,
    },
};

pub(super) const ORGANIC: Spacing = Spacing {
    kind: LayoutKind::Organic,
    roots: SideSpacing {
        primary_spacing: 200.0,
        primary_offset: 120.0,
        child_spacing: 120.0,
        child_offset: 100.0,
    },
    branches: SideSpacing {
        primary_spacing: 180.0,
        primary_offset: -120.0,
        child_spacing: 100.0,
        child_offset: -80.0,
    },
};

pub(super) fn build(tree: &LifeTree, spacing: &Spacing) -> TreeLayout {
    let trunk = PlacedNode {
        path: NodePath::Trunk,
        kind: tree.trunk.kind,
        pos: pos2(0.0, 0.0),
        level: 0,
        collapsed: false,
    };
    let mut layout = TreeLayout {
        kind: spacing.kind,
        nodes: vec![trunk],
        links: Vec::new(),
        node_radius: 0.0,
    };

    place_side(&mut layout, Side::Roots, &tree.roots, &spacing.roots);
    place_side(&mut layout, Side::Branches, &tree.branches, &spacing.branches);
    layout
}

fn place_side(layout: &mut TreeLayout, side: Side, nodes: &[TreeNode], spacing: &SideSpacing) {
    let trunk = pos2(0.0, 0.0);
    let xs = centred_offsets(nodes.len(), spacing.primary_spacing, 0.0);
    for ((index, node), x) in nodes.iter().enumerate().zip(xs) {
        let path = NodePath::Primary { side, index };
        let pos = pos2(x, spacing.primary_offset);
        layout.nodes.push(PlacedNode {
            path,
            kind: node.kind,
            pos,
            level: 1,
            collapsed: false,
        });
        layout.links.push(Link {
            parent: NodePath::Trunk,
            child: path,
            connector: Connector::Organic {
                from: trunk,
                to: pos,
            },
        });

        let child_y = pos.y + spacing.child_offset;
        let child_xs = centred_offsets(node.children.len(), spacing.child_spacing, pos.x);
        for ((child_index, child), child_x) in node.children.iter().enumerate().zip(child_xs) {
            let child_path = NodePath::Secondary {
                side,
                parent: index,
                index: child_index,
            };
            let child_pos = pos2(child_x, child_y);
            layout.nodes.push(PlacedNode {
                path: child_path,
                kind: child.kind,
                pos: child_pos,
                level: 2,
                collapsed: false,
            });
            layout.links.push(Link {
                parent: path,
                child: child_path,
                connector: Connector::Organic {
                    from: pos,
                    to: child_pos,
                },
            });
        }
    }
}
