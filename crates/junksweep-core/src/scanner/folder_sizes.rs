/// Folder-size aggregation — recursive size of each immediate child
/// directory of a root, for the disk-usage breakdown view.
///
/// Each subdirectory is summed to full depth with the walker's
/// error-tolerant semantics. Progress is reported as each subdirectory
/// completes; cancellation is checked before starting the next one, so
/// already-measured entries stay in the result list.
use crate::scanner::walker::{self, WalkOptions};
use crate::scanner::{CancelFlag, EVENT_CHANNEL_CAPACITY};
use crossbeam_channel::Receiver;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::thread;
use tracing::debug;

/// Total recursive size of one immediate child directory.
#[derive(Debug, Clone, Serialize)]
pub struct FolderSize {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Snapshot passed to the progress sink after each subdirectory.
#[derive(Debug)]
pub struct FolderSizeProgress<'a> {
    pub completed: usize,
    pub total: usize,
    pub path: &'a Path,
    pub bytes: u64,
}

/// Measure each immediate child directory of `root` not in the skip
/// set, sorted descending by size.
///
/// An unreadable root yields an empty list — the same skip-dont-fail
/// policy as every other scan.
pub fn measure_immediate_children(
    root: &Path,
    skip_dirs: &HashSet<String>,
    cancel: &CancelFlag,
    on_progress: &mut dyn FnMut(FolderSizeProgress),
) -> Vec<FolderSize> {
    let children: Vec<PathBuf> = match std::fs::read_dir(root) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter(|e| !skip_dirs.contains(e.file_name().to_string_lossy().as_ref()))
            .map(|e| e.path())
            .collect(),
        Err(err) => {
            debug!("folder-size root {} unreadable: {err}", root.display());
            return Vec::new();
        }
    };

    let total = children.len();
    let mut results: Vec<FolderSize> = Vec::with_capacity(total);

    for (i, path) in children.into_iter().enumerate() {
        if cancel.is_cancelled() {
            break;
        }
        let bytes = directory_size(&path, cancel);
        let measured = FolderSize { path, bytes };
        on_progress(FolderSizeProgress {
            completed: i + 1,
            total,
            path: &measured.path,
            bytes,
        });
        results.push(measured);
    }

    results.sort_by(|a, b| b.bytes.cmp(&a.bytes));
    results
}

/// Recursive file-size sum with no depth limit.
fn directory_size(path: &Path, cancel: &CancelFlag) -> u64 {
    walker::walk(path, &WalkOptions::unbounded(), cancel)
        .map(|f| f.size)
        .sum()
}

#[derive(Debug)]
pub enum FolderSizeEvent {
    /// One subdirectory finished measuring.
    Measured {
        path: PathBuf,
        bytes: u64,
        completed: usize,
        total: usize,
    },
    /// Final sorted list.
    Completed(Vec<FolderSize>),
    /// Cancelled; carries whatever was measured before the flag was
    /// observed.
    Cancelled(Vec<FolderSize>),
}

/// Handle to a folder-size scan running on a background thread.
pub struct FolderSizeHandle {
    pub events: Receiver<FolderSizeEvent>,
    cancel: CancelFlag,
    _thread: Option<thread::JoinHandle<()>>,
}

impl FolderSizeHandle {
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

/// Start measuring `root`'s immediate children on a background thread,
/// using the system skip set.
pub fn start_folder_size_scan(root: PathBuf) -> FolderSizeHandle {
    let (tx, rx) = crossbeam_channel::bounded(EVENT_CHANNEL_CAPACITY);
    let cancel = CancelFlag::new();
    let scan_cancel = cancel.clone();

    let thread = thread::Builder::new()
        .name("junksweep-sizes".into())
        .spawn(move || {
            let skip = walker::system_skip_dirs();
            let progress_tx = tx.clone();
            let results = measure_immediate_children(&root, &skip, &scan_cancel, &mut |p| {
                let _ = progress_tx.send(FolderSizeEvent::Measured {
                    path: p.path.to_path_buf(),
                    bytes: p.bytes,
                    completed: p.completed,
                    total: p.total,
                });
            });
            let terminal = if scan_cancel.is_cancelled() {
                FolderSizeEvent::Cancelled(results)
            } else {
                FolderSizeEvent::Completed(results)
            };
            let _ = tx.send(terminal);
        })
        .expect("failed to spawn folder-size thread");

    FolderSizeHandle {
        events: rx,
        cancel,
        _thread: Some(thread),
    }
}
