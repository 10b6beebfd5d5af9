//! Stored-name generation for uploads.
//!
//! Stored names have the shape `<unix-millis>-<sanitised original name>`.
//! The timestamp doubles as the upload's recorded creation time, which is
//! what listings sort by.

use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::models::Upload;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Name used when the client sends nothing usable.
pub const FALLBACK_NAME: &str = "upload";

/// Reduce a client-supplied file name to a safe stored-name suffix.
///
/// Only the last path component survives, and every whitespace run becomes
/// a single `-`.
pub fn sanitize(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let collapsed = WHITESPACE_RUN.replace_all(base, "-");
    match collapsed.as_ref() {
        "" | "." | ".." => FALLBACK_NAME.to_string(),
        name => name.to_string(),
    }
}

fn stored_name(millis: i64, sanitized: &str) -> String {
    format!("{}-{}", millis, sanitized)
}

/// Stored names to try, in order, for an upload arriving at `millis`.
///
/// Every store takes the first candidate that is still free. Two uploads of
/// the same file inside one millisecond get consecutive timestamps, so names
/// stay unique and ordered.
pub fn candidates(millis: i64, sanitized: &str) -> impl Iterator<Item = String> + '_ {
    (millis..).map(move |ts| stored_name(ts, sanitized))
}

/// Extract the millisecond timestamp prefix of a stored name.
pub fn parse_timestamp(stored: &str) -> Option<i64> {
    let (prefix, rest) = stored.split_once('-')?;
    if prefix.is_empty() || rest.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}

/// Creation time recorded in a stored name.
pub fn created_at(stored: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(stored).and_then(|ms| Utc.timestamp_millis_opt(ms).single())
}

/// Whether `name` can only ever refer to a file directly inside a category.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Order uploads oldest first by recorded creation time, then by name.
///
/// Files without a timestamp prefix fall back to their modification time.
pub fn sort_by_creation(uploads: &mut [Upload]) {
    uploads.sort_by(|a, b| {
        let ka = (a.created_at.unwrap_or(a.modified), &a.stored_name);
        let kb = (b.created_at.unwrap_or(b.modified), &b.stored_name);
        ka.cmp(&kb)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UploadCategory;
    use std::path::PathBuf;

    fn upload(name: &str, modified_ms: i64) -> Upload {
        Upload {
            category: UploadCategory::Video,
            stored_name: name.to_string(),
            path: PathBuf::from(name),
            created_at: created_at(name),
            modified: Utc.timestamp_millis_opt(modified_ms).unwrap(),
            size: 0,
        }
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(sanitize("My File.txt"), "My-File.txt");
        assert_eq!(sanitize("a  \t b.pdf"), "a-b.pdf");
        assert_eq!(sanitize(" lead"), "-lead");
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize("../../etc/passwd"), "passwd");
        assert_eq!(sanitize("C:\\Users\\me\\Essay 1.docx"), "Essay-1.docx");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize(""), FALLBACK_NAME);
        assert_eq!(sanitize("dir/"), FALLBACK_NAME);
        assert_eq!(sanitize(".."), FALLBACK_NAME);
    }

    #[test]
    fn test_candidates_bump_timestamp() {
        let first: Vec<String> = candidates(1000, "a.txt").take(3).collect();
        assert_eq!(first, ["1000-a.txt", "1001-a.txt", "1002-a.txt"]);

        let taken = ["1000-a.txt", "1001-a.txt"];
        let free = candidates(1000, "a.txt").find(|n| !taken.contains(&n.as_str()));
        assert_eq!(free.as_deref(), Some("1002-a.txt"));
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("1700000000000-My-File.txt"), Some(1_700_000_000_000));
        assert_eq!(parse_timestamp("1700000000000-"), None);
        assert_eq!(parse_timestamp("notes-1.txt"), None);
        assert_eq!(parse_timestamp("plain.txt"), None);
    }

    #[test]
    fn test_is_safe_name() {
        assert!(is_safe_name("1700000000000-a.txt"));
        assert!(!is_safe_name(""));
        assert!(!is_safe_name(".."));
        assert!(!is_safe_name("../profile.json"));
        assert!(!is_safe_name("a\\b"));
    }

    #[test]
    fn test_sort_by_creation_ignores_listing_order() {
        let mut uploads = vec![
            upload("3000-c.mp4", 0),
            upload("1000-z.mp4", 0),
            upload("2000-a.mp4", 0),
        ];
        sort_by_creation(&mut uploads);
        let names: Vec<_> = uploads.iter().map(|u| u.stored_name.as_str()).collect();
        assert_eq!(names, ["1000-z.mp4", "2000-a.mp4", "3000-c.mp4"]);
    }

    #[test]
    fn test_sort_by_creation_falls_back_to_mtime() {
        let mut uploads = vec![upload("2000-b.mp4", 0), upload("legacy.mp4", 1500)];
        sort_by_creation(&mut uploads);
        assert_eq!(uploads[0].stored_name, "legacy.mp4");
    }
}
