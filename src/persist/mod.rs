use crate::tree::{LifeTree, TreeNode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub mod store;

pub use store::TreeStore;

/// File name the whole tree is stored under.
pub const STORAGE_FILE: &str = "life-tree.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize tree: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Stored blob. Every key is optional on read; missing keys leave the
/// in-memory tree as it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTree {
    #[serde(default)]
    pub trunk: Option<TreeNode>,
    #[serde(default)]
    pub roots: Option<Vec<TreeNode>>,
    #[serde(default)]
    pub branches: Option<Vec<TreeNode>>,
    #[serde(default)]
    pub last_saved: Option<DateTime<Utc>>,
}

impl SavedTree {
    pub fn snapshot(tree: &LifeTree, saved_at: DateTime<Utc>) -> Self {
        Self {
            trunk: Some(tree.trunk.clone()),
            roots: Some(tree.roots.clone()),
            branches: Some(tree.branches.clone()),
            last_saved: Some(saved_at),
        }
    }

    pub fn apply_to(self, tree: &mut LifeTree) {
        if let Some(trunk) = self.trunk {
            tree.trunk = trunk;
        }
        if let Some(roots) = self.roots {
            tree.roots = roots;
        }
        if let Some(branches) = self.branches {
            tree.branches = branches;
        }
    }
}

/// Downloadable copy of the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedTree {
    pub trunk: TreeNode,
    pub roots: Vec<TreeNode>,
    pub branches: Vec<TreeNode>,
    pub export_date: DateTime<Utc>,
}

impl ExportedTree {
    pub fn new(tree: &LifeTree, exported_at: DateTime<Utc>) -> Self {
        Self {
            trunk: tree.trunk.clone(),
            roots: tree.roots.clone(),
            branches: tree.branches.clone(),
            export_date: exported_at,
        }
    }

    pub fn file_name(&self) -> String {
        format!("life-tree-{}.json", self.export_date.format("%Y-%m-%d"))
    }
}
