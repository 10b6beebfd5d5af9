//! Storage layer for portfolio data.
//!
//! Two independent stores hold all state; nothing is kept in memory between
//! requests.
//!
//! - [`RecordStore`]: named collections of JSON records plus the profile
//!   document. Every append rewrites the whole collection file.
//! - [`UploadStore`]: binary uploads filed by category under `uploads/`.
//!
//! ## Storage Layout
//!
//! ```text
//! <root>/
//! ├── learningLog.json          # [{title, content, date}]
//! ├── social.json               # [{name, message, date}]
//! ├── contacts.json             # [{name, email, message, date}]
//! ├── profile.json              # {name, bio}
//! ├── pseLab.json               # seeded on first access (20 records)
//! ├── peseLab.json              # seeded on first access (50 records)
//! └── uploads/
//!     ├── assignments/<ts>-<name>
//!     ├── videos/<ts>-<name>
//!     └── gallery/<ts>-<name>
//! ```
//!
//! ## Implementations
//!
//! - [`fs::FileRecordStore`] / [`fs::FileUploadStore`]: production, rooted at a directory.
//! - [`memory::MemoryRecordStore`] / [`memory::MemoryUploadStore`]: for tests.
//!
//! There is no locking. Two overlapping appends to the same collection can
//! lose one of the writes.

pub mod fs;
pub mod memory;
pub mod naming;
pub mod seed;

use crate::Result;
use crate::models::{Collection, Profile, Record, Upload, UploadCategory};
use chrono::Utc;
use std::path::Path;
use tracing::info;

/// Append/read access to record collections and the profile document.
pub trait RecordStore: Send + Sync {
    /// Read a collection in insertion order.
    ///
    /// Never fails: a missing or unparseable collection reads as empty.
    fn read(&self, collection: Collection) -> Vec<Record>;

    /// Whether the collection has been persisted at all.
    fn exists(&self, collection: Collection) -> bool;

    /// Replace the collection's contents.
    fn write_all(&self, collection: Collection, records: &[Record]) -> Result<()>;

    /// Load the profile. `None` if never saved or unreadable.
    fn load_profile(&self) -> Option<Profile>;

    /// Overwrite the profile.
    fn save_profile(&self, profile: &Profile) -> Result<()>;

    /// Append a record, stamping `date` with the current time.
    ///
    /// Returns the record as stored.
    fn append(&self, collection: Collection, mut record: Record) -> Result<Record> {
        let mut records = self.read(collection);
        record.stamp(Utc::now());
        records.push(record.clone());
        self.write_all(collection, &records)?;
        Ok(record)
    }

    /// Write `seed` as the collection's contents if it has never been written.
    ///
    /// Seed records without a `date` are stamped with the current time.
    /// Returns `true` if the seed was written.
    fn ensure_seed(&self, collection: Collection, seed: &[Record]) -> Result<bool> {
        if self.exists(collection) {
            return Ok(false);
        }
        let now = Utc::now();
        let records: Vec<Record> = seed
            .iter()
            .cloned()
            .map(|mut r| {
                if r.date().is_none() {
                    r.stamp(now);
                }
                r
            })
            .collect();
        self.write_all(collection, &records)?;
        info!(collection = %collection, count = records.len(), "seeded collection");
        Ok(true)
    }
}

/// Category-filed storage of uploaded files.
pub trait UploadStore: Send + Sync {
    /// Make sure every category directory exists.
    fn ensure_dirs(&self) -> Result<()>;

    /// Store `bytes` and return the generated stored name.
    fn save(&self, category: UploadCategory, original_name: &str, bytes: &[u8]) -> Result<String>;

    /// List a category, oldest first by recorded creation time.
    fn list(&self, category: UploadCategory) -> Result<Vec<Upload>>;

    /// Look up one stored file. Unsafe names never resolve.
    fn resolve(&self, category: UploadCategory, stored_name: &str) -> Result<Option<Upload>>;

    fn count(&self, category: UploadCategory) -> Result<usize> {
        Ok(self.list(category)?.len())
    }
}

/// Open the file-backed stores rooted at `root`, creating upload directories.
pub fn open_file_stores(root: &Path) -> Result<(fs::FileRecordStore, fs::FileUploadStore)> {
    let records = fs::FileRecordStore::new(root);
    let uploads = fs::FileUploadStore::new(root);
    uploads.ensure_dirs()?;
    info!(root = %root.display(), "storage ready");
    Ok((records, uploads))
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryRecordStore;
    use super::*;

    #[test]
    fn test_append_stamps_date_and_keeps_fields() {
        let store = MemoryRecordStore::new();
        let record = Record::new().with("title", "Day 1").with("content", "Ownership");
        let stored = store.append(Collection::LearningLog, record.clone()).unwrap();

        assert!(stored.date().is_some());
        assert_eq!(stored.without_date(), record);

        let all = store.read(Collection::LearningLog);
        assert_eq!(all.last(), Some(&stored));
    }

    #[test]
    fn test_append_overrides_caller_date() {
        let store = MemoryRecordStore::new();
        let record = Record::new().with("date", "1999-01-01T00:00:00.000Z");
        let stored = store.append(Collection::Social, record).unwrap();
        assert_ne!(stored.field("date"), Some("1999-01-01T00:00:00.000Z"));
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let store = MemoryRecordStore::new();
        for i in 0..3 {
            store
                .append(Collection::Contacts, Record::new().with("name", format!("n{}", i)))
                .unwrap();
        }
        let names: Vec<_> = store
            .read(Collection::Contacts)
            .iter()
            .map(|r| r.field("name").unwrap().to_string())
            .collect();
        assert_eq!(names, ["n0", "n1", "n2"]);
    }

    #[test]
    fn test_ensure_seed_is_idempotent() {
        let store = MemoryRecordStore::new();
        let seed = vec![Record::new().with("title", "a"), Record::new().with("title", "b")];

        assert!(store.ensure_seed(Collection::PseLab, &seed).unwrap());
        let first = store.read(Collection::PseLab);
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|r| r.date().is_some()));

        let other = vec![Record::new().with("title", "c")];
        assert!(!store.ensure_seed(Collection::PseLab, &other).unwrap());
        assert_eq!(store.read(Collection::PseLab), first);
    }

    #[test]
    fn test_ensure_seed_keeps_existing_dates() {
        let store = MemoryRecordStore::new();
        let seed = vec![Record::new().with("date", "2025-01-02T03:04:05.000Z")];
        store.ensure_seed(Collection::PeseLab, &seed).unwrap();
        assert_eq!(
            store.read(Collection::PeseLab)[0].field("date"),
            Some("2025-01-02T03:04:05.000Z")
        );
    }
}
