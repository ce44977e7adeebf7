//! # VaultStore
//!
//! The authoritative in-process state of the backend. Depending on
//! [`StoreMode`] it holds either an ordered list of [`VaultItem`]s or a single
//! secret string. Operations belonging to the other mode return
//! [`StoreError::Unsupported`].
//!
//! ## Persistence
//!
//! A collection store opened with a persistence path loads the snapshot once
//! in [`VaultStore::open`] and rewrites it after every successful mutation.
//! If the rewrite fails, the mutation is undone in memory and the error is
//! returned, so memory never claims more than the disk holds.
//!
//! ## Sharing
//!
//! `VaultStore` itself is plain data with `&mut self` mutators. Request
//! handlers share it as a [`SharedStore`]: writers take the lock for the whole
//! mutate-then-persist step, so concurrent adds cannot lose each other and
//! concurrent saves cannot interleave on the file.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use parking_lot::RwLock;

use crate::config::{StoreConfig, StoreMode};
use crate::error::{StoreError, StoreResult};
use crate::item::{next_id, VaultItem};
use crate::persist::JsonFile;

/// Store handle shared across request handlers.
pub type SharedStore = Arc<RwLock<VaultStore>>;

#[derive(Debug)]
pub struct VaultStore {
    mode: StoreMode,
    items: Vec<VaultItem>,
    secret: Option<String>,
    file: Option<JsonFile>,
}

impl VaultStore {
    /// Builds a store from `config`, loading the persistence file if one is
    /// configured. Never fails: an absent or malformed file means an empty
    /// store.
    pub fn open(config: &StoreConfig) -> Self {
        let file = match (config.mode, &config.persistence) {
            (StoreMode::Collection, Some(path)) => Some(JsonFile::new(path)),
            (StoreMode::SingleSecret, Some(path)) => {
                tracing::warn!(
                    path = %path.display(),
                    "single-secret mode is memory only, ignoring persistence file"
                );
                None
            }
            (_, None) => None,
        };

        let items = file.as_ref().map(JsonFile::load).unwrap_or_default();

        tracing::info!(
            mode = %config.mode,
            persistent = file.is_some(),
            items = items.len(),
            "vault store opened"
        );

        Self {
            mode: config.mode,
            items,
            secret: None,
            file,
        }
    }

    /// Wraps the store for sharing between handlers.
    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    pub fn mode(&self) -> StoreMode {
        self.mode
    }

    /// Whether mutations are mirrored to disk.
    pub fn is_persistent(&self) -> bool {
        self.file.is_some()
    }

    /// Number of items held. Always zero in single-secret mode.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // -----------------------------------------------------------------------
    // Collection operations
    // -----------------------------------------------------------------------

    /// Appends a new item stamped with the current local time and returns
    /// its identifier.
    pub fn add(&mut self, content: String) -> StoreResult<String> {
        self.add_at(content, Local::now().naive_local())
    }

    /// [`add`](Self::add) with an explicit timestamp.
    pub fn add_at(&mut self, content: String, now: NaiveDateTime) -> StoreResult<String> {
        self.require(StoreMode::Collection, "add")?;

        let id = next_id(now, &self.items);
        self.items.push(VaultItem::new(id.clone(), content, now));

        if let Err(e) = self.persist() {
            self.items.pop();
            return Err(e);
        }

        tracing::info!(id = %id, total = self.items.len(), "item added");
        Ok(id)
    }

    /// All items in insertion order.
    pub fn list(&self) -> StoreResult<&[VaultItem]> {
        self.require(StoreMode::Collection, "list")?;
        Ok(&self.items)
    }

    /// The item with exactly this identifier.
    pub fn get(&self, id: &str) -> StoreResult<&VaultItem> {
        self.require(StoreMode::Collection, "get")?;
        self.items
            .iter()
            .find(|item| item.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Removes the item with exactly this identifier. Survivors keep their
    /// relative order.
    pub fn delete(&mut self, id: &str) -> StoreResult<()> {
        self.require(StoreMode::Collection, "delete")?;

        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let removed = self.items.remove(index);

        if let Err(e) = self.persist() {
            self.items.insert(index, removed);
            return Err(e);
        }

        tracing::info!(id = %id, total = self.items.len(), "item deleted");
        Ok(())
    }

    /// Replaces the content of the first item with this identifier. `id` and
    /// `created_at` are left alone.
    pub fn edit(&mut self, id: &str, content: String) -> StoreResult<()> {
        self.require(StoreMode::Collection, "edit")?;

        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let previous = std::mem::replace(&mut item.content, content);

        if let Err(e) = self.persist() {
            if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
                item.content = previous;
            }
            return Err(e);
        }

        tracing::info!(id = %id, "item edited");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Single-secret operations
    // -----------------------------------------------------------------------

    /// Overwrites the secret. No history is kept.
    pub fn save_secret(&mut self, content: String) -> StoreResult<()> {
        self.require(StoreMode::SingleSecret, "save")?;
        self.secret = Some(content);
        tracing::info!("secret saved");
        Ok(())
    }

    /// The current secret. An empty string counts as nothing saved.
    pub fn load_secret(&self) -> StoreResult<&str> {
        self.require(StoreMode::SingleSecret, "load")?;
        match self.secret.as_deref() {
            Some(secret) if !secret.is_empty() => Ok(secret),
            _ => Err(StoreError::Empty),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn require(&self, mode: StoreMode, operation: &'static str) -> StoreResult<()> {
        if self.mode == mode {
            Ok(())
        } else {
            Err(StoreError::Unsupported {
                operation,
                mode: self.mode,
            })
        }
    }

    fn persist(&self) -> StoreResult<()> {
        match &self.file {
            Some(file) => file.save(&self.items).map_err(|e| {
                tracing::error!(path = %file.path().display(), error = %e, "failed to persist store");
                e
            }),
            None => Ok(()),
        }
    }
}
