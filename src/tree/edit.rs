use super::validate::{validate_name, ValidationError};
use super::{LifeTree, NodeKind, NodePath, Side, TreeNode};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("no node at {0}")]
    NotFound(NodePath),
    #[error("{kind} nodes cannot be placed under {parent}")]
    KindNotAllowed { parent: NodePath, kind: NodeKind },
    #[error("{0} is already at the deepest level")]
    TooDeep(NodePath),
    #[error("the trunk cannot be removed")]
    TrunkRemoval,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Form contents for a new node or an in-place edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDraft {
    pub name: String,
    pub description: String,
    pub kind: NodeKind,
}

impl NodeDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
        }
    }

    fn into_node(self) -> Result<TreeNode, ValidationError> {
        let name = validate_name(&self.name)?;
        Ok(TreeNode::new(name, self.kind, self.description.trim()))
    }
}

impl LifeTree {
    pub fn allowed_child_kinds(&self, parent: NodePath) -> &'static [NodeKind] {
        match parent.side() {
            _ if parent.level() >= 2 => &[],
            None => &[NodeKind::Roots, NodeKind::Branch],
            Some(Side::Roots) => &[NodeKind::DeepRoots],
            Some(Side::Branches) => &[NodeKind::Leaf],
        }
    }

    /// Kinds a node can take without changing which collection holds it.
    pub fn editable_kinds(&self, path: NodePath) -> &'static [NodeKind] {
        match path.side() {
            None => &[NodeKind::Trunk],
            Some(Side::Roots) => &[NodeKind::Roots, NodeKind::DeepRoots],
            Some(Side::Branches) => &[NodeKind::Branch, NodeKind::Leaf],
        }
    }

    pub fn add_child(&mut self, parent: NodePath, draft: NodeDraft) -> Result<NodePath, TreeError> {
        if self.get(parent).is_none() {
            return Err(TreeError::NotFound(parent));
        }
        if parent.level() >= 2 {
            return Err(TreeError::TooDeep(parent));
        }
        if !self.allowed_child_kinds(parent).contains(&draft.kind) {
            return Err(TreeError::KindNotAllowed {
                parent,
                kind: draft.kind,
            });
        }

        let node = draft.into_node()?;
        let name = node.name.clone();
        let path = match parent {
            NodePath::Trunk => {
                let side = match node.kind.side() {
                    Some(Side::Roots) => Side::Roots,
                    _ => Side::Branches,
                };
                let list = self.side_mut(side);
                list.push(node);
                NodePath::Primary {
                    side,
                    index: list.len() - 1,
                }
            }
            NodePath::Primary { side, index } => {
                let children = &mut self
                    .side_mut(side)
                    .get_mut(index)
                    .ok_or(TreeError::NotFound(parent))?
                    .children;
                children.push(node);
                NodePath::Secondary {
                    side,
                    parent: index,
                    index: children.len() - 1,
                }
            }
            NodePath::Secondary { .. } => return Err(TreeError::TooDeep(parent)),
        };

        info!(%parent, %path, name = %name, "node added");
        Ok(path)
    }

    /// Replaces name, description and kind; details and children stay.
    pub fn update(&mut self, path: NodePath, edit: NodeDraft) -> Result<(), TreeError> {
        if !self.editable_kinds(path).contains(&edit.kind) {
            return Err(TreeError::KindNotAllowed {
                parent: path.parent().unwrap_or(NodePath::Trunk),
                kind: edit.kind,
            });
        }
        let name = validate_name(&edit.name)?;
        let node = self.get_mut(path).ok_or(TreeError::NotFound(path))?;
        node.name = name;
        node.description = edit.description.trim().to_string();
        node.kind = edit.kind;
        info!(%path, "node updated");
        Ok(())
    }

    /// Removes the node and, with it, its direct children.
    pub fn remove(&mut self, path: NodePath) -> Result<TreeNode, TreeError> {
        let removed = match path {
            NodePath::Trunk => return Err(TreeError::TrunkRemoval),
            NodePath::Primary { side, index } => {
                let list = self.side_mut(side);
                if index >= list.len() {
                    return Err(TreeError::NotFound(path));
                }
                list.remove(index)
            }
            NodePath::Secondary {
                side,
                parent,
                index,
            } => {
                let children = &mut self
                    .side_mut(side)
                    .get_mut(parent)
                    .ok_or(TreeError::NotFound(path))?
                    .children;
                if index >= children.len() {
                    return Err(TreeError::NotFound(path));
                }
                children.remove(index)
            }
        };
        info!(%path, name = %removed.name, children = removed.children.len(), "node removed");
        Ok(removed)
    }

    /// Accepted ideas land as new branches under the trunk. Either every
    /// idea is added or none is.
    pub fn add_ideas<'a, I>(&mut self, ideas: I) -> Result<Vec<NodePath>, TreeError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let drafts = ideas
            .into_iter()
            .map(|(title, description)| {
                validate_name(title)?;
                Ok(NodeDraft::new(title, description, NodeKind::Branch))
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;
        drafts
            .into_iter()
            .map(|draft| self.add_child(NodePath::Trunk, draft))
            .collect()
    }
}
