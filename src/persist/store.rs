use super::{ExportedTree, SavedTree, StoreError, STORAGE_FILE};
use crate::tree::LifeTree;
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Whole-tree persistence in a single JSON file.
#[derive(Debug, Clone)]
pub struct TreeStore {
    dir: PathBuf,
}

impl TreeStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(STORAGE_FILE)
    }

    pub fn save(&self, tree: &LifeTree, saved_at: DateTime<Utc>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&SavedTree::snapshot(tree, saved_at))?;
        write_atomic(&self.dir, &self.path(), &bytes)?;
        info!(path = %self.path().display(), nodes = tree.len(), "tree saved");
        Ok(())
    }

    /// `Ok(None)` when nothing has been stored yet.
    pub fn load(&self) -> Result<Option<SavedTree>, StoreError> {
        let path = self.path();
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no stored tree");
                return Ok(None);
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        let saved = serde_json::from_slice(&data).map_err(|source| StoreError::Parse {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "tree loaded");
        Ok(Some(saved))
    }

    /// Writes a dated export into `out_dir` and returns its path.
    pub fn export(
        &self,
        tree: &LifeTree,
        out_dir: &Path,
        exported_at: DateTime<Utc>,
    ) -> Result<PathBuf, StoreError> {
        let export = ExportedTree::new(tree, exported_at);
        let target = out_dir.join(export.file_name());
        let bytes = serde_json::to_vec_pretty(&export)?;
        write_atomic(out_dir, &target, &bytes)?;
        info!(path = %target.display(), "tree exported");
        Ok(target)
    }
}

fn write_atomic(dir: &Path, final_path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let write_err = |source| StoreError::Write {
        path: final_path.to_path_buf(),
        source,
    };
    fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp_name = final_path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = dir.join(tmp_name);

    fs::write(&tmp_path, bytes).map_err(write_err)?;
    match fs::rename(&tmp_path, final_path) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if final_path.exists() {
                fs::remove_file(final_path).map_err(write_err)?;
                fs::rename(&tmp_path, final_path).map_err(write_err)
            } else {
                Err(write_err(rename_err))
            }
        }
    }
}
