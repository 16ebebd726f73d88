use crate::tree::{LifeTree, NodeKind, NodePath};
use egui::Pos2;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub mod connector;
mod hierarchy;
mod radial;
mod stacked;

pub use connector::Connector;

/// Trunk is drawn as an upright ellipse with these half-axes.
pub const TRUNK_HALF_WIDTH: f32 = 25.0;
pub const TRUNK_HALF_HEIGHT: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Roots below, branches above, siblings centred under their parent.
    #[default]
    Vertical,
    /// Wider variant of the vertical layout.
    Organic,
    /// Siblings fanned over arcs around the trunk.
    Radial,
    /// Top-down collapsible hierarchy.
    Hierarchy,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 4] = [
        LayoutKind::Vertical,
        LayoutKind::Organic,
        LayoutKind::Radial,
        LayoutKind::Hierarchy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Vertical => "Vertical",
            Self::Organic => "Organic",
            Self::Radial => "Radial",
            Self::Hierarchy => "Hierarchy",
        }
    }

    pub fn supports_collapse(&self) -> bool {
        matches!(self, Self::Hierarchy)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub path: NodePath,
    pub kind: NodeKind,
    pub pos: Pos2,
    pub level: usize,
    /// True when the node has children hidden by a collapse.
    pub collapsed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub parent: NodePath,
    pub child: NodePath,
    pub connector: Connector,
}

#[derive(Debug, Clone, Default)]
pub struct LayoutOptions {
    pub canvas_width: f32,
    pub node_radius: f32,
    pub collapsed: HashSet<NodePath>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayout {
    pub kind: LayoutKind,
    pub nodes: Vec<PlacedNode>,
    pub links: Vec<Link>,
    pub node_radius: f32,
}

impl TreeLayout {
    pub fn build(kind: LayoutKind, tree: &LifeTree, options: &LayoutOptions) -> Self {
        let mut layout = match kind {
            LayoutKind::Vertical => stacked::build(tree, &stacked::VERTICAL),
            LayoutKind::Organic => stacked::build(tree, &stacked::ORGANIC),
            LayoutKind::Radial => radial::build(tree),
            LayoutKind::Hierarchy => hierarchy::build(tree, options),
        };
        layout.node_radius = options.node_radius;
        layout
    }

    pub fn node(&self, path: NodePath) -> Option<&PlacedNode> {
        self.nodes.iter().find(|node| node.path == path)
    }

    pub fn drawn_radius(&self, level: usize) -> f32 {
        match level {
            0 => TRUNK_HALF_WIDTH,
            1 => self.node_radius * 1.1,
            _ => self.node_radius * 0.8,
        }
    }

    /// Closest node whose drawn shape contains `point`.
    pub fn hit_test(&self, point: Pos2) -> Option<NodePath> {
        self.nodes
            .iter()
            .filter_map(|node| {
                let offset = point - node.pos;
                let inside = if node.level == 0 {
                    let nx = offset.x / TRUNK_HALF_WIDTH;
                    let ny = offset.y / TRUNK_HALF_HEIGHT;
                    nx * nx + ny * ny <= 1.0
                } else {
                    offset.length() <= self.drawn_radius(node.level)
                };
                inside.then_some((node.path, offset.length_sq()))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(path, _)| path)
    }
}

/// Collapse set that hides everything below level 1.
pub fn collapse_below_primaries(tree: &LifeTree) -> HashSet<NodePath> {
    tree.nodes()
        .into_iter()
        .filter(|(path, node)| path.level() == 1 && !node.children.is_empty())
        .map(|(path, _)| path)
        .collect()
}

/// Offsets that spread `count` siblings evenly around `centre`.
pub(crate) fn centred_offsets(count: usize, spacing: f32, centre: f32) -> impl Iterator<Item = f32> {
    let start = centre - count.saturating_sub(1) as f32 * spacing / 2.0;
    (0..count).map(move |index| start + index as f32 * spacing)
}
