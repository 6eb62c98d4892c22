//! Conversion identifiers
//!
//! An ID is `<clean filename>_<YYYYMMDD_HHMMSS>`. When that ID is already
//! taken the first free `_2`, `_3`, ... suffix is appended.

use chrono::{DateTime, Utc};
use std::path::Path;

/// Reduce a source path to an ID-safe stem
///
/// Drops the directory and extension, strips a `YYYYMMDD_HHMMSS_` upload
/// prefix, and replaces spaces and hyphens with underscores.
pub fn clean_filename(source_file: &str) -> String {
    let stem = Path::new(source_file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    if stem.is_empty() {
        return "unknown".to_string();
    }

    let parts: Vec<&str> = stem.split('_').collect();
    let has_upload_prefix = parts.len() >= 3
        && parts[0].len() == 8
        && parts[0].chars().all(|c| c.is_ascii_digit())
        && !parts[1].is_empty()
        && parts[1].chars().all(|c| c.is_ascii_digit());

    let name = if has_upload_prefix {
        parts[2..].join("_")
    } else {
        stem.to_string()
    };

    name.replace([' ', '-'], "_")
}

/// Build an unused conversion ID
///
/// `taken` reports whether a candidate already exists.
pub fn conversion_id(
    source_file: &str,
    created_at: DateTime<Utc>,
    taken: impl Fn(&str) -> bool,
) -> String {
    let base = format!(
        "{}_{}",
        clean_filename(source_file),
        created_at.format("%Y%m%d_%H%M%S")
    );

    if !taken(&base) {
        return base;
    }

    (2u32..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}
