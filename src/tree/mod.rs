use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub mod edit;
pub mod sample;
pub mod validate;

pub use edit::{NodeDraft, TreeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Trunk,
    Roots,
    DeepRoots,
    Branch,
    Leaf,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trunk => "trunk",
            Self::Roots => "roots",
            Self::DeepRoots => "deep_roots",
            Self::Branch => "branch",
            Self::Leaf => "leaf",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Trunk => "Trunk (central objective)",
            Self::Roots => "Roots (values/foundations)",
            Self::DeepRoots => "Deep root",
            Self::Branch => "Branch (outcome/goal)",
            Self::Leaf => "Leaf (concrete action)",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Trunk => "🌳",
            Self::Roots => "🌱",
            Self::DeepRoots => "🪴",
            Self::Branch => "🌿",
            Self::Leaf => "🍃",
        }
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            Self::Trunk => None,
            Self::Roots | Self::DeepRoots => Some(Side::Roots),
            Self::Branch | Self::Leaf => Some(Side::Branches),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form info panel field: either a sentence or a bullet list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailValue {
    Text(String),
    List(Vec<String>),
}

impl DetailValue {
    pub fn display_value(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::List(items) => items.join(", "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, DetailValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(name: impl Into<String>, kind: NodeKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            details: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Name without its decorative emoji prefix, cut to `max_chars`.
    pub fn short_name(&self, max_chars: usize) -> String {
        let clean: String = self
            .name
            .chars()
            .skip_while(|ch| !ch.is_alphanumeric())
            .collect();
        let clean = clean.trim();
        if clean.chars().count() > max_chars {
            let cut: String = clean.chars().take(max_chars).collect();
            format!("{cut}...")
        } else {
            clean.to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Roots,
    Branches,
}

impl Side {
    fn id_prefix(&self) -> &'static str {
        match self {
            Self::Roots => "root",
            Self::Branches => "branch",
        }
    }
}

/// Positional address of a node. Paths shift when earlier siblings are
/// removed, so they must be re-resolved after every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodePath {
    Trunk,
    Primary { side: Side, index: usize },
    Secondary { side: Side, parent: usize, index: usize },
}

impl NodePath {
    pub fn root(index: usize) -> Self {
        Self::Primary {
            side: Side::Roots,
            index,
        }
    }

    pub fn branch(index: usize) -> Self {
        Self::Primary {
            side: Side::Branches,
            index,
        }
    }

    pub fn level(&self) -> usize {
        match self {
            Self::Trunk => 0,
            Self::Primary { .. } => 1,
            Self::Secondary { .. } => 2,
        }
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            Self::Trunk => None,
            Self::Primary { side, .. } | Self::Secondary { side, .. } => Some(*side),
        }
    }

    pub fn parent(&self) -> Option<NodePath> {
        match *self {
            Self::Trunk => None,
            Self::Primary { .. } => Some(Self::Trunk),
            Self::Secondary { side, parent, .. } => Some(Self::Primary {
                side,
                index: parent,
            }),
        }
    }

    pub fn child(&self, index: usize) -> Option<NodePath> {
        match *self {
            Self::Primary { side, index: parent } => Some(Self::Secondary {
                side,
                parent,
                index,
            }),
            _ => None,
        }
    }

    /// Where this node sits once `removed` (and its children) are gone.
    pub fn after_removal(self, removed: NodePath) -> Option<NodePath> {
        if self == removed || self.parent() == Some(removed) {
            return None;
        }
        let shifted = match (self, removed) {
            (
                Self::Primary { side, index },
                Self::Primary {
                    side: gone_side,
                    index: gone,
                },
            ) if side == gone_side && index > gone => Self::Primary {
                side,
                index: index - 1,
            },
            (
                Self::Secondary {
                    side,
                    parent,
                    index,
                },
                Self::Primary {
                    side: gone_side,
                    index: gone,
                },
            ) if side == gone_side && parent > gone => Self::Secondary {
                side,
                parent: parent - 1,
                index,
            },
            (
                Self::Secondary {
                    side,
                    parent,
                    index,
                },
                Self::Secondary {
                    side: gone_side,
                    parent: gone_parent,
                    index: gone,
                },
            ) if side == gone_side && parent == gone_parent && index > gone => Self::Secondary {
                side,
                parent,
                index: index - 1,
            },
            _ => self,
        };
        Some(shifted)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trunk => f.write_str("trunk"),
            Self::Primary { side, index } => write!(f, "{}_{index}", side.id_prefix()),
            Self::Secondary {
                side,
                parent,
                index,
            } => write!(f, "{}_{parent}_child_{index}", side.id_prefix()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeTree {
    pub trunk: TreeNode,
    #[serde(default)]
    pub roots: Vec<TreeNode>,
    #[serde(default)]
    pub branches: Vec<TreeNode>,
}

impl Default for LifeTree {
    fn default() -> Self {
        sample::default_tree()
    }
}

impl LifeTree {
    pub fn side(&self, side: Side) -> &Vec<TreeNode> {
        match side {
            Side::Roots => &self.roots,
            Side::Branches => &self.branches,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut Vec<TreeNode> {
        match side {
            Side::Roots => &mut self.roots,
            Side::Branches => &mut self.branches,
        }
    }

    pub fn get(&self, path: NodePath) -> Option<&TreeNode> {
        match path {
            NodePath::Trunk => Some(&self.trunk),
            NodePath::Primary { side, index } => self.side(side).get(index),
            NodePath::Secondary {
                side,
                parent,
                index,
            } => self.side(side).get(parent)?.children.get(index),
        }
    }

    pub fn get_mut(&mut self, path: NodePath) -> Option<&mut TreeNode> {
        match path {
            NodePath::Trunk => Some(&mut self.trunk),
            NodePath::Primary { side, index } => self.side_mut(side).get_mut(index),
            NodePath::Secondary {
                side,
                parent,
                index,
            } => self.side_mut(side).get_mut(parent)?.children.get_mut(index),
        }
    }

    /// Trunk first, then each root followed by its children, then branches.
    pub fn nodes(&self) -> Vec<(NodePath, &TreeNode)> {
        let mut out = vec![(NodePath::Trunk, &self.trunk)];
        for side in [Side::Roots, Side::Branches] {
            for (index, node) in self.side(side).iter().enumerate() {
                out.push((NodePath::Primary { side, index }, node));
                for (child, child_node) in node.children.iter().enumerate() {
                    out.push((
                        NodePath::Secondary {
                            side,
                            parent: index,
                            index: child,
                        },
                        child_node,
                    ));
                }
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        1 + [Side::Roots, Side::Branches]
            .iter()
            .flat_map(|side| self.side(*side))
            .map(|node| 1 + node.children.len())
            .sum::<usize>()
    }

    #[cfg(test)]
    pub fn find_by_name(&self, name: &str) -> Option<NodePath> {
        self.nodes()
            .into_iter()
            .find(|(_, node)| node.name == name)
            .map(|(path, _)| path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_ids_follow_parent_path() {
        assert_eq!(NodePath::Trunk.to_string(), "trunk");
        assert_eq!(NodePath::root(2).to_string(), "root_2");
        assert_eq!(NodePath::branch(0).to_string(), "branch_0");
        let child = NodePath::branch(3).child(1).expect("primary has children");
        assert_eq!(child.to_string(), "branch_3_child_1");
        assert_eq!(child.parent(), Some(NodePath::branch(3)));
        assert_eq!(child.level(), 2);
        assert!(child.child(0).is_none());
        assert_eq!(child.side(), Some(Side::Branches));
        assert_eq!(NodePath::root(0).side(), Some(Side::Roots));
        assert_eq!(NodePath::Trunk.side(), None);
    }

    #[test]
    fn paths_shift_past_a_removed_sibling() {
        let secondary = |parent, index| NodePath::Secondary {
            side: Side::Branches,
            parent,
            index,
        };
        let gone = NodePath::branch(1);
        assert_eq!(gone.after_removal(gone), None);
        assert_eq!(secondary(1, 0).after_removal(gone), None);
        assert_eq!(NodePath::branch(0).after_removal(gone), Some(NodePath::branch(0)));
        assert_eq!(NodePath::branch(2).after_removal(gone), Some(NodePath::branch(1)));
        assert_eq!(secondary(3, 2).after_removal(gone), Some(secondary(2, 2)));
        assert_eq!(NodePath::root(2).after_removal(gone), Some(NodePath::root(2)));
        assert_eq!(NodePath::Trunk.after_removal(gone), Some(NodePath::Trunk));

        let leaf = secondary(0, 1);
        assert_eq!(secondary(0, 3).after_removal(leaf), Some(secondary(0, 2)));
        assert_eq!(secondary(1, 3).after_removal(leaf), Some(secondary(1, 3)));
        assert_eq!(NodePath::branch(0).after_removal(leaf), Some(NodePath::branch(0)));
    }

    #[test]
    fn nodes_lists_trunk_then_roots_then_branches() {
        let tree = LifeTree::default();
        let nodes = tree.nodes();
        assert_eq!(nodes[0].0, NodePath::Trunk);
        assert_eq!(nodes[1].0, NodePath::root(0));
        assert_eq!(nodes.len(), tree.len());
        let first_branch = nodes
            .iter()
            .position(|(path, _)| *path == NodePath::branch(0))
            .expect("default tree has branches");
        assert!(nodes[..first_branch]
            .iter()
            .all(|(path, _)| path.side() != Some(Side::Branches)));
    }

    #[test]
    fn node_json_uses_type_key_and_mixed_details() {
        let raw = r#"{
  "name": "🌱 Core values",
  "type": "deep_roots",
  "description": "What holds everything up",
  "details": {
    "values": ["Honesty", "Perseverance"],
    "note": "Guides every decision"
  }
}"#;
        let node: TreeNode = serde_json::from_str(raw).expect("node should parse");
        assert_eq!(node.kind, NodeKind::DeepRoots);
        assert!(node.children.is_empty());
        assert_eq!(
            node.details.get("values"),
            Some(&DetailValue::List(vec![
                "Honesty".to_string(),
                "Perseverance".to_string()
            ]))
        );
        assert_eq!(
            node.details.get("note").map(DetailValue::display_value),
            Some("Guides every decision".to_string())
        );
    }

    #[test]
    fn short_name_strips_emoji_and_truncates() {
        let node = TreeNode::new("🌿 Professional Development", NodeKind::Branch, "");
        assert_eq!(node.short_name(10), "Profession...");
        assert_eq!(node.short_name(40), "Professional Development");
    }
}
