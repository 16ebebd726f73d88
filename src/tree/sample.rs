use super::LifeTree;

const DEFAULT_TREE: &str = include_str!("data/default_tree.json");

/// The built-in tree shown on first launch or after `--reset`.
pub fn default_tree() -> LifeTree {
    match serde_json::from_str(DEFAULT_TREE) {
        Ok(tree) => tree,
        Err(err) => {
            tracing::error!("embedded default tree is malformed: {err}");
            LifeTree {
                trunk: super::TreeNode::new(
                    "🌳 My Main Objective",
                    super::NodeKind::Trunk,
                    "The centre of my life tree",
                ),
                roots: Vec::new(),
                branches: Vec::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;

    #[test]
    fn embedded_tree_parses_with_expected_shape() {
        let tree: LifeTree =
            serde_json::from_str(DEFAULT_TREE).expect("embedded tree should deserialize");
        assert_eq!(tree.trunk.kind, NodeKind::Trunk);
        assert_eq!(tree.roots.len(), 2);
        assert_eq!(tree.branches.len(), 4);
        assert_eq!(tree.roots[0].children.len(), 2);
        assert!(tree
            .roots
            .iter()
            .flat_map(|root| &root.children)
            .all(|child| child.kind == NodeKind::DeepRoots));
        assert!(tree
            .branches
            .iter()
            .flat_map(|branch| &branch.children)
            .all(|child| child.kind == NodeKind::Leaf));
    }
}
