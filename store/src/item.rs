//! # Vault Items
//!
//! A [`VaultItem`] is one stored record: an opaque `content` string plus the
//! identifier and creation time the server assigns when the item is added.
//!
//! Identifiers are the add-time timestamp at second resolution
//! (`YYYYMMDDHHMMSS`). Two adds inside the same second would produce the same
//! timestamp, so [`next_id`] appends `-1`, `-2`, ... until the identifier is
//! unused among the items currently held.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::{CREATED_AT_FORMAT, ID_FORMAT};

/// One stored record.
///
/// Fields missing from a persisted object decode as empty strings, so a
/// hand-edited or partially written file still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultItem {
    /// Server-assigned identifier. Sole key for delete and edit.
    #[serde(default)]
    pub id: String,
    /// Client payload. Opaque.
    #[serde(default)]
    pub content: String,
    /// `YYYY-MM-DD HH:MM:SS`. Set once, never changed.
    #[serde(default)]
    pub created_at: String,
}

impl VaultItem {
    /// Builds an item stamped with `now`. `id` must already be unique.
    pub fn new(id: String, content: String, now: NaiveDateTime) -> Self {
        Self {
            id,
            content,
            created_at: now.format(CREATED_AT_FORMAT).to_string(),
        }
    }
}

/// Generates an identifier for an item added at `now` that does not collide
/// with any of `existing`.
pub fn next_id(now: NaiveDateTime, existing: &[VaultItem]) -> String {
    let base = now.format(ID_FORMAT).to_string();
    let taken = |candidate: &str| existing.iter().any(|item| item.id == candidate);

    if !taken(&base) {
        return base;
    }

    let mut suffix = 1u64;
    loop {
        let candidate = format!("{}-{}", base, suffix);
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 2)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .unwrap()
    }

    fn item(id: &str) -> VaultItem {
        VaultItem {
            id: id.into(),
            content: String::new(),
            created_at: String::new(),
        }
    }

    #[test]
    fn new_item_formats_created_at() {
        let it = VaultItem::new("20251102140903".into(), "note".into(), at(14, 9, 3));
        assert_eq!(it.created_at, "2025-11-02 14:09:03");
        assert_eq!(it.content, "note");
    }

    #[test]
    fn next_id_uses_plain_timestamp_when_free() {
        assert_eq!(next_id(at(8, 0, 0), &[]), "20251102080000");
    }

    #[test]
    fn next_id_suffixes_same_second_collisions() {
        let held = vec![item("20251102080000"), item("20251102080000-1")];
        assert_eq!(next_id(at(8, 0, 0), &held), "20251102080000-2");
    }

    #[test]
    fn next_id_reuses_freed_suffix() {
        let held = vec![item("20251102080000"), item("20251102080000-2")];
        assert_eq!(next_id(at(8, 0, 0), &held), "20251102080000-1");
    }

    #[test]
    fn missing_fields_decode_as_empty() {
        let it: VaultItem = serde_json::from_str(r#"{"content":"x"}"#).unwrap();
        assert_eq!(it.id, "");
        assert_eq!(it.content, "x");
        assert_eq!(it.created_at, "");
    }
}
