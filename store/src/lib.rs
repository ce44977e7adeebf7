// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Vault Store
//!
//! State and persistence for the vault backend. The HTTP layer lives in the
//! `vault-server` binary; everything it reads or mutates goes through
//! [`VaultStore`].
//!
//! ## Modules
//!
//! - **config**: Defaults, timestamp layouts, [`StoreMode`] and [`StoreConfig`].
//! - **error**: [`StoreError`] and the [`StoreResult`] alias.
//! - **item**: The [`VaultItem`] record and identifier generation.
//! - **persist**: Whole-file JSON snapshot with atomic replace.
//! - **store**: [`VaultStore`]: add/list/delete/edit or save/load, by mode.
//!
//! ## Modes
//!
//! One store type covers every shape the backend has needed:
//!
//! | Mode            | Persistence   | Operations                  |
//! |-----------------|---------------|-----------------------------|
//! | `collection`    | JSON file     | add, list, delete, edit     |
//! | `collection`    | memory only   | add, list, delete, edit     |
//! | `single-secret` | memory only   | save, load                  |

pub mod config;
pub mod error;
pub mod item;
pub mod persist;
pub mod store;

pub use config::{StoreConfig, StoreMode};
pub use error::{StoreError, StoreResult};
pub use item::VaultItem;
pub use store::{SharedStore, VaultStore};
