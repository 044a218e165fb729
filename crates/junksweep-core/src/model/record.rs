/// File records produced by the scanners.
///
/// A [`FileRecord`] is a best-effort snapshot taken at stat time; the
/// file is never re-validated afterwards. Records are immutable once
/// created and are discarded after the consuming front end has acted
/// on them — nothing is persisted between scans.
use crate::classify::Category;
use compact_str::CompactString;
use serde::Serialize;
use std::path::PathBuf;

/// A single file observed during a traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Absolute path with OS-native separators.
    pub path: PathBuf,
    /// File name only (the final path component).
    pub name: CompactString,
    /// Size in bytes as observed at stat time.
    pub size: u64,
}

impl FileRecord {
    pub fn new(path: PathBuf, name: impl AsRef<str>, size: u64) -> Self {
        Self {
            path,
            name: CompactString::new(name.as_ref()),
            size,
        }
    }
}

/// A [`FileRecord`] enriched with its classification.
///
/// Produced by the per-application correlator, where every discovered
/// file is classified on the spot so the front end can group by
/// category without a second pass.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedFileRecord {
    #[serde(flatten)]
    pub record: FileRecord,
    /// Human-readable description; for executables and libraries this
    /// may come from the binary's own version metadata.
    pub description: String,
    /// Display icon token (an emoji, matching the category tables).
    pub icon: &'static str,
    pub category: Category,
}
