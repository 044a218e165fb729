/// Duplicate file detection — size-first grouping, then full-content
/// hash within each size bucket.
///
/// Files with unique sizes cannot be duplicates, so the size pass
/// eliminates the overwhelming majority of candidates without touching
/// file content. Remaining candidates are hashed with BLAKE3 — a
/// cryptographic-strength hash, so within a size bucket hash equality
/// is the sole grouping criterion and collisions are treated as
/// negligible. Zero-byte files are excluded outright: every empty file
/// would otherwise trivially "duplicate" every other.
use crate::model::FileRecord;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;

/// A group of two or more files with identical size and content hash.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DuplicateGroup {
    /// Size shared by every member.
    pub size: u64,
    /// Hex BLAKE3 digest of the shared content.
    pub hash: String,
    /// Always ≥ 2 members.
    pub members: Vec<FileRecord>,
}

/// Group duplicates among `records`.
///
/// Unreadable files are excluded from grouping without aborting the
/// batch. No ordering is guaranteed across groups or members.
pub fn find_duplicates(records: &[FileRecord]) -> Vec<DuplicateGroup> {
    let mut by_size: HashMap<u64, Vec<&FileRecord>> = HashMap::new();
    for record in records {
        by_size.entry(record.size).or_default().push(record);
    }

    let candidates: Vec<(u64, Vec<&FileRecord>)> = by_size
        .into_iter()
        .filter(|(size, bucket)| *size > 0 && bucket.len() >= 2)
        .collect();

    // Hashing is the expensive step; buckets are independent, so they
    // are processed in parallel.
    candidates
        .into_par_iter()
        .flat_map_iter(|(size, bucket)| {
            let mut by_hash: HashMap<String, Vec<FileRecord>> = HashMap::new();
            for record in bucket {
                match hash_file(&record.path) {
                    Ok(hash) => by_hash.entry(hash).or_default().push(record.clone()),
                    Err(err) => {
                        debug!("excluding {} from grouping: {err}", record.path.display());
                    }
                }
            }
            by_hash
                .into_iter()
                .filter(|(_, members)| members.len() >= 2)
                .map(move |(hash, members)| DuplicateGroup {
                    size,
                    hash,
                    members,
                })
        })
        .collect()
}

/// Hex BLAKE3 digest of a file's full content.
fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hasher.finalize().to_hex().to_string())
}
