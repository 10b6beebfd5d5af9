//! Filesystem-backed stores rooted at a portfolio directory.

use super::{RecordStore, UploadStore, naming};
use crate::{Error, Result};
use crate::models::{Collection, Profile, Record, Upload, UploadCategory};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory under the root holding all uploads.
pub const UPLOADS_DIR: &str = "uploads";

/// Profile document file name.
pub const PROFILE_FILE: &str = "profile.json";

fn absolute(root: &Path) -> PathBuf {
    std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf())
}

/// Parse a collection file. Non-object elements are dropped.
fn parse_records(content: &str) -> serde_json::Result<Vec<Record>> {
    let values: Vec<Value> = serde_json::from_str(content)?;
    Ok(values
        .into_iter()
        .filter_map(|v| match v {
            Value::Object(map) => Some(Record(map)),
            _ => None,
        })
        .collect())
}

/// Record collections stored as one pretty-printed JSON array per file.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    root: PathBuf,
}

impl FileRecordStore {
    pub fn new(root: &Path) -> Self {
        Self {
            root: absolute(root),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn collection_path(&self, collection: Collection) -> PathBuf {
        self.root.join(collection.file_name())
    }

    pub fn profile_path(&self) -> PathBuf {
        self.root.join(PROFILE_FILE)
    }
}

impl RecordStore for FileRecordStore {
    fn read(&self, collection: Collection) -> Vec<Record> {
        let path = self.collection_path(collection);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable collection, treating as empty");
                return Vec::new();
            }
        };
        parse_records(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "corrupt collection, treating as empty");
            Vec::new()
        })
    }

    fn exists(&self, collection: Collection) -> bool {
        self.collection_path(collection).exists()
    }

    fn write_all(&self, collection: Collection, records: &[Record]) -> Result<()> {
        let path = self.collection_path(collection);
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&path, json)?;
        debug!(collection = %collection, count = records.len(), "wrote collection");
        Ok(())
    }

    fn load_profile(&self) -> Option<Profile> {
        let content = fs::read_to_string(self.profile_path()).ok()?;
        match serde_json::from_str(&content) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "corrupt profile, ignoring");
                None
            }
        }
    }

    fn save_profile(&self, profile: &Profile) -> Result<()> {
        let json = serde_json::to_string_pretty(profile)?;
        fs::write(self.profile_path(), json)?;
        debug!("saved profile");
        Ok(())
    }
}

/// Uploads filed under `<root>/uploads/<category dir>/`.
#[derive(Debug, Clone)]
pub struct FileUploadStore {
    uploads_root: PathBuf,
}

impl FileUploadStore {
    pub fn new(root: &Path) -> Self {
        Self {
            uploads_root: absolute(root).join(UPLOADS_DIR),
        }
    }

    /// Directory served verbatim under `/uploads`.
    pub fn uploads_root(&self) -> &Path {
        &self.uploads_root
    }

    pub fn category_dir(&self, category: UploadCategory) -> PathBuf {
        match category.dir_name() {
            Some(dir) => self.uploads_root.join(dir),
            None => self.uploads_root.clone(),
        }
    }

    /// Build an `Upload` for a path, or `None` if it is not a regular file.
    fn upload_at(category: UploadCategory, name: &str, path: PathBuf) -> Result<Option<Upload>> {
        let meta = match fs::metadata(&path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if !meta.is_file() {
            return Ok(None);
        }
        let modified: DateTime<Utc> = meta.modified()?.into();
        Ok(Some(Upload {
            category,
            stored_name: name.to_string(),
            created_at: naming::created_at(name),
            modified,
            size: meta.len(),
            path,
        }))
    }
}

impl UploadStore for FileUploadStore {
    fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.uploads_root)?;
        for category in UploadCategory::ALL {
            fs::create_dir_all(self.category_dir(category))?;
        }
        debug!(root = %self.uploads_root.display(), "upload directories ready");
        Ok(())
    }

    fn save(&self, category: UploadCategory, original_name: &str, bytes: &[u8]) -> Result<String> {
        let dir = self.category_dir(category);
        let sanitized = naming::sanitize(original_name);

        // create_new makes the existence check and the write one step
        for name in naming::candidates(Utc::now().timestamp_millis(), &sanitized) {
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(dir.join(&name))
            {
                Ok(mut file) => {
                    file.write_all(bytes)?;
                    debug!(category = %category, name = %name, size = bytes.len(), "stored upload");
                    return Ok(name);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(Error::Other(format!("no free stored name for {}", sanitized)))
    }

    fn list(&self, category: UploadCategory) -> Result<Vec<Upload>> {
        let dir = self.category_dir(category);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut uploads = Vec::new();
        for entry in entries {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if let Some(upload) = Self::upload_at(category, &name, entry.path())? {
                uploads.push(upload);
            }
        }
        naming::sort_by_creation(&mut uploads);
        Ok(uploads)
    }

    fn resolve(&self, category: UploadCategory, stored_name: &str) -> Result<Option<Upload>> {
        if !naming::is_safe_name(stored_name) {
            return Ok(None);
        }
        let path = self.category_dir(category).join(stored_name);
        Self::upload_at(category, stored_name, path)
    }
}
