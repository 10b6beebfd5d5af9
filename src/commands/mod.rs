//! Command implementations for the Folio CLI.
//!
//! Commands return a result type implementing [`Output`], which the binary
//! prints as JSON by default or as text with `-H`.

use serde::Serialize;
use std::path::Path;

use crate::Result;
use crate::pages::{ActivityLevel, Counts, Pages};
use crate::storage::fs::{FileRecordStore, FileUploadStore};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Result of `folio stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsResult {
    pub root: String,
    pub counts: Counts,
    pub total: usize,
    pub activity: ActivityLevel,
}

impl Output for StatsResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
    }

    fn to_human(&self) -> String {
        let c = &self.counts;
        let rows = [
            ("Assignments", c.assignments),
            ("Introduction videos", c.videos),
            ("Gallery images", c.gallery),
            ("Learning log entries", c.learning_log),
            ("Social posts", c.social),
            ("Messages received", c.contacts),
        ];
        let mut lines = vec![format!("Portfolio: {}", self.root)];
        for (label, count) in rows {
            lines.push(format!("  {:<22}{}", format!("{}:", label), count));
        }
        lines.push(format!(
            "  {:<22}{} ({})",
            "Total:",
            self.total,
            self.activity.label()
        ));
        lines.join("\n")
    }
}

/// Count everything stored under `root`.
///
/// Read-only: upload directories that do not exist yet count as empty and
/// are not created.
pub fn stats(root: &Path) -> Result<StatsResult> {
    let records = FileRecordStore::new(root);
    let uploads = FileUploadStore::new(root);
    let dashboard = Pages::new(&records, &uploads).dashboard()?;
    Ok(StatsResult {
        root: records.root().display().to_string(),
        counts: dashboard.counts,
        total: dashboard.total,
        activity: dashboard.activity,
    })
}
