//! In-memory stores for testing logic without filesystem I/O.

use super::{RecordStore, UploadStore, naming};
use crate::models::{Collection, Profile, Record, Upload, UploadCategory};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// In-memory record store.
#[derive(Default)]
pub struct MemoryRecordStore {
    collections: RwLock<HashMap<Collection, Vec<Record>>>,
    profile: RwLock<Option<Profile>>,
    simulate_write_error: AtomicBool,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::Relaxed);
    }

    fn check_writable(&self) -> Result<()> {
        if self.simulate_write_error.load(Ordering::Relaxed) {
            return Err(Error::Other("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl RecordStore for MemoryRecordStore {
    fn read(&self, collection: Collection) -> Vec<Record> {
        let collections = self.collections.read().unwrap_or_else(|e| e.into_inner());
        collections.get(&collection).cloned().unwrap_or_default()
    }

    fn exists(&self, collection: Collection) -> bool {
        let collections = self.collections.read().unwrap_or_else(|e| e.into_inner());
        collections.contains_key(&collection)
    }

    fn write_all(&self, collection: Collection, records: &[Record]) -> Result<()> {
        self.check_writable()?;
        let mut collections = self.collections.write().unwrap_or_else(|e| e.into_inner());
        collections.insert(collection, records.to_vec());
        Ok(())
    }

    fn load_profile(&self) -> Option<Profile> {
        self.profile
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn save_profile(&self, profile: &Profile) -> Result<()> {
        self.check_writable()?;
        *self.profile.write().unwrap_or_else(|e| e.into_inner()) = Some(profile.clone());
        Ok(())
    }
}

#[derive(Clone)]
struct StoredFile {
    bytes: Vec<u8>,
    modified: DateTime<Utc>,
}

/// In-memory upload store.
#[derive(Default)]
pub struct MemoryUploadStore {
    files: RwLock<HashMap<UploadCategory, HashMap<String, StoredFile>>>,
    simulate_write_error: AtomicBool,
}

impl MemoryUploadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::Relaxed);
    }

    /// Test helper to place a file under an exact stored name.
    pub fn insert(&self, category: UploadCategory, stored_name: &str, bytes: &[u8]) {
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
        files.entry(category).or_default().insert(
            stored_name.to_string(),
            StoredFile {
                bytes: bytes.to_vec(),
                modified: Utc::now(),
            },
        );
    }

    /// Contents of a stored file.
    pub fn bytes(&self, category: UploadCategory, stored_name: &str) -> Option<Vec<u8>> {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        files
            .get(&category)
            .and_then(|c| c.get(stored_name))
            .map(|f| f.bytes.clone())
    }

    fn to_upload(category: UploadCategory, name: &str, file: &StoredFile) -> Upload {
        Upload {
            category,
            stored_name: name.to_string(),
            path: PathBuf::from(format!("memory://{}/{}", category, name)),
            created_at: naming::created_at(name),
            modified: file.modified,
            size: file.bytes.len() as u64,
        }
    }
}

impl UploadStore for MemoryUploadStore {
    fn ensure_dirs(&self) -> Result<()> {
        Ok(())
    }

    fn save(&self, category: UploadCategory, original_name: &str, bytes: &[u8]) -> Result<String> {
        if self.simulate_write_error.load(Ordering::Relaxed) {
            return Err(Error::Other("Simulated write error".to_string()));
        }
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
        let category_files = files.entry(category).or_default();
        let sanitized = naming::sanitize(original_name);
        let name = naming::candidates(Utc::now().timestamp_millis(), &sanitized)
            .find(|n| !category_files.contains_key(n))
            .ok_or_else(|| Error::Other(format!("no free stored name for {}", sanitized)))?;
        category_files.insert(
            name.clone(),
            StoredFile {
                bytes: bytes.to_vec(),
                modified: Utc::now(),
            },
        );
        Ok(name)
    }

    fn list(&self, category: UploadCategory) -> Result<Vec<Upload>> {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        let mut uploads: Vec<Upload> = files
            .get(&category)
            .map(|c| {
                c.iter()
                    .map(|(name, file)| Self::to_upload(category, name, file))
                    .collect()
            })
            .unwrap_or_default();
        naming::sort_by_creation(&mut uploads);
        Ok(uploads)
    }

    fn resolve(&self, category: UploadCategory, stored_name: &str) -> Result<Option<Upload>> {
        if !naming::is_safe_name(stored_name) {
            return Ok(None);
        }
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        Ok(files
            .get(&category)
            .and_then(|c| c.get(stored_name))
            .map(|file| Self::to_upload(category, stored_name, file)))
    }
}
