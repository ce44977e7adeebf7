//! # JSON Persistence File
//!
//! The collection is mirrored to a single JSON file: a pretty-printed array
//! of [`VaultItem`]s, rewritten in full after every mutation.
//!
//! ## Atomicity
//!
//! [`JsonFile::save`] writes to a hidden temp file next to the target and
//! renames it over the target. The temp file shares the target's directory,
//! so the rename stays on one filesystem and readers see either the old
//! snapshot or the new one, never half of each.
//!
//! ## Loading
//!
//! [`JsonFile::load`] is best effort. A missing or unreadable file, or one
//! that does not decode as an item array, yields an empty list. The server
//! starts either way.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreResult;
use crate::item::VaultItem;

/// Handle on the persistence file.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot this handle reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot, falling back to an empty list on any failure.
    pub fn load(&self) -> Vec<VaultItem> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) => {
                tracing::info!(
                    path = %self.path.display(),
                    reason = %e,
                    "no persistence file, creating a fresh store"
                );
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Option<Vec<VaultItem>>>(&data) {
            Ok(items) => {
                let items = items.unwrap_or_default();
                tracing::info!(
                    path = %self.path.display(),
                    count = items.len(),
                    "loaded items from persistence file"
                );
                items
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "persistence file is malformed, starting with an empty store"
                );
                Vec::new()
            }
        }
    }

    /// Overwrites the snapshot with `items`.
    pub fn save(&self, items: &[VaultItem]) -> StoreResult<()> {
        let data = serde_json::to_vec_pretty(items)?;

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let tmp_path = parent.join(format!(
            ".{}.tmp",
            self.path.file_name().unwrap_or_default().to_string_lossy()
        ));

        let replaced = fs::write(&tmp_path, &data).and_then(|()| fs::rename(&tmp_path, &self.path));
        if let Err(e) = replaced {
            // A failed write can leave a truncated temp file; never keep it.
            if tmp_path.is_file() {
                let _ = fs::remove_file(&tmp_path);
            }
            return Err(e.into());
        }

        tracing::debug!(path = %self.path.display(), count = items.len(), "store persisted");
        Ok(())
    }
}
