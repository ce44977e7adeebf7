//! # Store Configuration & Constants
//!
//! Every default the backend ships with lives here: the listen port, the one
//! browser origin allowed through CORS, the persistence file name, and the
//! timestamp layouts used for identifiers and creation times.
//!
//! The server binary exposes each of these as a CLI flag, so the constants
//! are only the values you get when nobody says otherwise.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Network Defaults
// ---------------------------------------------------------------------------

/// Port the HTTP API listens on.
pub const DEFAULT_PORT: u16 = 8080;

/// The development frontend. The only origin allowed through CORS.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Persistence file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "vault.json";

// ---------------------------------------------------------------------------
// Timestamp Layouts
// ---------------------------------------------------------------------------

/// Identifier layout: `YYYYMMDDHHMMSS`, second resolution.
pub const ID_FORMAT: &str = "%Y%m%d%H%M%S";

/// Creation-time layout: `YYYY-MM-DD HH:MM:SS`.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Store Mode
// ---------------------------------------------------------------------------

/// Which shape of state the store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreMode {
    /// An ordered list of [`VaultItem`](crate::item::VaultItem)s with
    /// add/list/delete/edit.
    #[default]
    Collection,
    /// A single scalar secret with save/load. Never persisted.
    SingleSecret,
}

impl StoreMode {
    /// Stable name used on the command line and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreMode::Collection => "collection",
            StoreMode::SingleSecret => "single-secret",
        }
    }
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "collection" => Ok(StoreMode::Collection),
            "single-secret" | "single_secret" | "single" => Ok(StoreMode::SingleSecret),
            other => Err(format!("unknown store mode: {}", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

/// Everything [`VaultStore::open`](crate::store::VaultStore::open) needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Collection or single secret.
    pub mode: StoreMode,
    /// Path of the JSON persistence file. `None` keeps everything in memory.
    pub persistence: Option<PathBuf>,
}

impl StoreConfig {
    /// Collection store mirrored to `path`.
    pub fn persistent(path: impl Into<PathBuf>) -> Self {
        Self {
            mode: StoreMode::Collection,
            persistence: Some(path.into()),
        }
    }

    /// Collection store that lives and dies with the process.
    pub fn in_memory() -> Self {
        Self {
            mode: StoreMode::Collection,
            persistence: None,
        }
    }

    /// Single-secret store. Always memory only.
    pub fn single_secret() -> Self {
        Self {
            mode: StoreMode::SingleSecret,
            persistence: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::persistent(DEFAULT_DATA_FILE)
    }
}
