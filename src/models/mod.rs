//! Data models for portfolio content.
//!
//! This module defines the core data structures:
//! - `Collection` - Named record collections persisted as JSON arrays
//! - `Record` - A caller-shaped JSON object stamped with a `date`
//! - `Profile` - The singleton `{name, bio}` document
//! - `UploadCategory` / `Upload` - Binary files stored per category
//! - `LogEntry`, `SocialPost`, `ContactMessage` - Typed read views of records

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

/// Field name holding the server-assigned timestamp.
pub const DATE_FIELD: &str = "date";

/// A named, ordered sequence of records backed by one JSON array file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    LearningLog,
    Social,
    Contacts,
    /// Seeded demo collection (20 lab activities)
    PseLab,
    /// Seeded demo collection (50 lab activities)
    PeseLab,
}

impl Collection {
    /// Logical collection name, also the file stem.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LearningLog => "learningLog",
            Self::Social => "social",
            Self::Contacts => "contacts",
            Self::PseLab => "pseLab",
            Self::PeseLab => "peseLab",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single JSON object in a collection.
///
/// Records have no stable identity; their position in the collection is all
/// that distinguishes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style string field setter.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.insert(key.to_string(), Value::String(value.into()));
        self
    }

    /// Get a string field. Non-string values yield `None`.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Set the `date` field to `at` (ISO-8601, millisecond precision, `Z` suffix).
    pub fn stamp(&mut self, at: DateTime<Utc>) {
        self.0.insert(
            DATE_FIELD.to_string(),
            Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
    }

    /// Parse the `date` field, if present and well-formed.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.field(DATE_FIELD)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc))
    }

    /// Record without its `date` field, for comparisons that ignore the stamp.
    pub fn without_date(&self) -> Record {
        let mut map = self.0.clone();
        map.remove(DATE_FIELD);
        Record(map)
    }
}

/// The portfolio owner's profile. At most one exists; saving overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bio: String,
}

impl Profile {
    pub fn new(name: impl Into<String>, bio: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bio: bio.into(),
        }
    }
}

/// Category of an uploaded file, deciding where it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UploadCategory {
    Assignment,
    Video,
    Image,
    /// Anything without a dedicated directory lands in the uploads root
    Other,
}

impl UploadCategory {
    pub const ALL: [UploadCategory; 4] = [
        UploadCategory::Assignment,
        UploadCategory::Video,
        UploadCategory::Image,
        UploadCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assignment => "assignment",
            Self::Video => "video",
            Self::Image => "image",
            Self::Other => "other",
        }
    }

    /// Directory under the uploads root. `None` means the root itself.
    pub fn dir_name(&self) -> Option<&'static str> {
        match self {
            Self::Assignment => Some("assignments"),
            Self::Video => Some("videos"),
            Self::Image => Some("gallery"),
            Self::Other => None,
        }
    }

    /// Map a multipart form field name to a category.
    pub fn from_field(field: &str) -> Self {
        match field {
            "assignment" => Self::Assignment,
            "introVideo" => Self::Video,
            "image" => Self::Image,
            _ => Self::Other,
        }
    }

    /// Multipart form field used by the upload form for this category.
    pub fn form_field(&self) -> &'static str {
        match self {
            Self::Assignment => "assignment",
            Self::Video => "introVideo",
            Self::Image => "image",
            Self::Other => "file",
        }
    }

    /// Public URL prefix under which files of this category are served.
    pub fn url_prefix(&self) -> String {
        match self.dir_name() {
            Some(dir) => format!("/uploads/{}", dir),
            None => "/uploads".to_string(),
        }
    }
}

impl fmt::Display for UploadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored upload. Identity is the generated `stored_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub category: UploadCategory,
    pub stored_name: String,
    /// Absolute path for file-backed stores, a `memory://` path otherwise
    pub path: PathBuf,
    /// Creation time embedded in the stored name
    pub created_at: Option<DateTime<Utc>>,
    pub modified: DateTime<Utc>,
    pub size: u64,
}

/// A learning log or lab entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub title: String,
    pub content: String,
    pub date: Option<DateTime<Utc>>,
}

impl From<&Record> for LogEntry {
    fn from(record: &Record) -> Self {
        Self {
            title: record.field("title").unwrap_or_default().to_string(),
            content: record.field("content").unwrap_or_default().to_string(),
            date: record.date(),
        }
    }
}

/// A post on the social timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialPost {
    pub name: String,
    pub message: String,
    pub date: Option<DateTime<Utc>>,
}

impl From<&Record> for SocialPost {
    fn from(record: &Record) -> Self {
        Self {
            name: record.field("name").unwrap_or_default().to_string(),
            message: record.field("message").unwrap_or_default().to_string(),
            date: record.date(),
        }
    }
}

/// A message left through the contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub date: Option<DateTime<Utc>>,
}

impl From<&Record> for ContactMessage {
    fn from(record: &Record) -> Self {
        Self {
            name: record.field("name").unwrap_or_default().to_string(),
            email: record.field("email").unwrap_or_default().to_string(),
            message: record.field("message").unwrap_or_default().to_string(),
            date: record.date(),
        }
    }
}
