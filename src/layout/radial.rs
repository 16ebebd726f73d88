use super::{Connector, LayoutKind, Link, PlacedNode, TreeLayout};
use crate::tree::{LifeTree, NodePath, Side, TreeNode};
use egui::pos2;
use std::f32::consts::PI;

const PRIMARY_ARC: f32 = PI * 1.4;
const PRIMARY_START: f32 = -PI * 0.7;
const PRIMARY_DISTANCE: f32 = 180.0;
const CHILD_SPREAD: f32 = PI / 4.0;
const CHILD_DISTANCE: f32 = 120.0;

pub(super) fn build(tree: &LifeTree) -> TreeLayout {
    let mut layout = TreeLayout {
        kind: LayoutKind::Radial,
        nodes: vec![PlacedNode {
            path: NodePath::Trunk,
            kind: tree.trunk.kind,
            pos: pos2(0.0, 0.0),
            level: 0,
            collapsed: false,
        }],
        links: Vec::new(),
        node_radius: 0.0,
    };
    // Roots mirror the arc vertically.
    place_side(&mut layout, Side::Roots, &tree.roots, -1.0);
    place_side(&mut layout, Side::Branches, &tree.branches, 1.0);
    layout
}

fn place_side(layout: &mut TreeLayout, side: Side, nodes: &[TreeNode], mirror: f32) {
    let step = PRIMARY_ARC / nodes.len().max(1) as f32;
    for (index, node) in nodes.iter().enumerate() {
        let angle = PRIMARY_START + step * index as f32;
        let path = NodePath::Primary { side, index };
        let pos = pos2(
            angle.cos() * PRIMARY_DISTANCE,
            angle.sin() * PRIMARY_DISTANCE * mirror,
        );
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
            connector: Connector::Arc {
                from: pos2(0.0, 0.0),
                to: pos,
            },
        });

        let child_step = CHILD_SPREAD / node.children.len().saturating_sub(1).max(1) as f32;
        let child_start = angle - CHILD_SPREAD / 2.0;
        for (child_index, child) in node.children.iter().enumerate() {
            let child_angle = child_start + child_step * child_index as f32;
            let child_path = NodePath::Secondary {
                side,
                parent: index,
                index: child_index,
            };
            let child_pos = pos2(
                pos.x + child_angle.cos() * CHILD_DISTANCE,
                pos.y + child_angle.sin() * CHILD_DISTANCE,
            );
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
                connector: Connector::Arc {
                    from: pos,
                    to: child_pos,
                },
            });
        }
    }
}
