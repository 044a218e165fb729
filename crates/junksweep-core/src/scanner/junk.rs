/// Junk scanner — walks every configured junk category, then sweeps
/// all eligible volumes in parallel for oversized files.
///
/// State machine: Idle → Scanning (categories) → Scanning (large
/// files) → Completed | Cancelled. Results stream incrementally: one
/// [`JunkScanEvent::CategoryDone`] batch per category as its walk
/// finishes, one [`JunkScanEvent::LargeFiles`] batch after all volume
/// sweeps have joined, then exactly one terminal event carrying the
/// summary. Batches emitted before a cancellation remain valid —
/// nothing is rolled back.
use crate::model::FileRecord;
use crate::platform;
use crate::scanner::categories::{junk_categories, JunkCategorySpec};
use crate::scanner::walker::{self, WalkOptions};
use crate::scanner::{CancelFlag, EVENT_CHANNEL_CAPACITY};
use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info};

/// Minimum size for the large-file sweep: 200 MiB.
pub const LARGE_FILE_MIN_BYTES: u64 = 200 * 1024 * 1024;

/// Depth cap for the per-volume sweep. Junk of interest lives shallow;
/// the cap bounds worst-case latency on pathological trees.
pub const LARGE_FILE_MAX_DEPTH: usize = 15;

/// Only the biggest files are worth showing; the merged sweep result
/// is truncated to this many records.
pub const LARGE_FILE_LIMIT: usize = 500;

/// Aggregate totals reported exactly once per scan, on completion or
/// cancellation alike.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JunkSummary {
    /// Total bytes across all category batches (large files excluded —
    /// they are candidates for review, not junk).
    pub junk_bytes: u64,
    pub junk_files: u64,
    /// Volume roots the large-file sweep covered.
    pub volumes: Vec<PathBuf>,
}

#[derive(Debug)]
pub enum JunkScanEvent {
    /// Approximate progress; percent is proportional to categories
    /// processed over `total + 1`, reserving the final share for the
    /// volume sweep.
    Progress { percent: u8, label: String },
    /// One junk category finished; `files` is its complete batch.
    CategoryDone {
        key: &'static str,
        files: Vec<FileRecord>,
    },
    /// Merged, size-sorted large-file batch from all volumes.
    LargeFiles(Vec<FileRecord>),
    Completed(JunkSummary),
    Cancelled(JunkSummary),
}

/// Synchronous scan engine. Reports through `sink`; polls `cancel`
/// between categories, between volumes, and inside every walk. The
/// skip set is shared by both phases.
pub fn run_junk_scan(
    specs: &[JunkCategorySpec],
    volumes: &[PathBuf],
    skip_dirs: &Arc<HashSet<String>>,
    cancel: &CancelFlag,
    sink: &mut dyn FnMut(JunkScanEvent),
) {
    let mut summary = JunkSummary {
        volumes: volumes.to_vec(),
        ..Default::default()
    };
    let total = specs.len();

    // Phase 1: fixed-order category walks.
    for (i, spec) in specs.iter().enumerate() {
        if cancel.is_cancelled() {
            break;
        }
        let percent = (i * 100 / (total + 1)) as u8;
        sink(JunkScanEvent::Progress {
            percent,
            label: format!("Scanning: {}", spec.label),
        });

        let files = scan_junk_category(spec, skip_dirs, cancel);
        summary.junk_bytes += files.iter().map(|f| f.size).sum::<u64>();
        summary.junk_files += files.len() as u64;
        debug!("category {} found {} files", spec.key, files.len());
        sink(JunkScanEvent::CategoryDone {
            key: spec.key,
            files,
        });
    }

    // Phase 2: concurrent per-volume large-file sweep.
    if !cancel.is_cancelled() {
        sink(JunkScanEvent::Progress {
            percent: (total * 100 / (total + 1)) as u8,
            label: "Searching for large files...".to_owned(),
        });
        sink(JunkScanEvent::LargeFiles(sweep_volumes(
            volumes, skip_dirs, cancel,
        )));
    }

    if cancel.is_cancelled() {
        info!(
            "junk scan cancelled: {} files, {} bytes so far",
            summary.junk_files, summary.junk_bytes
        );
        sink(JunkScanEvent::Cancelled(summary));
    } else {
        sink(JunkScanEvent::Progress {
            percent: 100,
            label: "Scan complete".to_owned(),
        });
        info!(
            "junk scan complete: {} files, {} bytes",
            summary.junk_files, summary.junk_bytes
        );
        sink(JunkScanEvent::Completed(summary));
    }
}

/// Walk every base path of one category, applying its extension and
/// name-prefix filters. Missing base paths are skipped silently.
pub fn scan_junk_category(
    spec: &JunkCategorySpec,
    skip_dirs: &Arc<HashSet<String>>,
    cancel: &CancelFlag,
) -> Vec<FileRecord> {
    let mut files = Vec::new();
    for base in &spec.base_paths {
        if cancel.is_cancelled() {
            break;
        }
        if !base.is_dir() {
            continue;
        }
        let depth = if spec.recursive { usize::MAX } else { 0 };
        let options = WalkOptions::with_depth(depth).skip_dirs(Arc::clone(skip_dirs));
        files.extend(walker::walk(base, &options, cancel).filter(|f| spec.matches(&f.name)));
    }
    files
}

/// Sweep every volume concurrently — one task per volume, joined
/// before merging (a barrier, not a race). The merged result is sorted
/// descending by size and truncated to [`LARGE_FILE_LIMIT`].
pub fn sweep_volumes(
    volumes: &[PathBuf],
    skip_dirs: &Arc<HashSet<String>>,
    cancel: &CancelFlag,
) -> Vec<FileRecord> {
    let merged: Mutex<Vec<FileRecord>> = Mutex::new(Vec::new());

    thread::scope(|scope| {
        for root in volumes {
            let merged = &merged;
            scope.spawn(move || {
                let found = sweep_volume(root, skip_dirs, cancel);
                debug!("volume {} sweep: {} large files", root.display(), found.len());
                merged.lock().extend(found);
            });
        }
    });

    let mut all = merged.into_inner();
    all.sort_by(|a, b| b.size.cmp(&a.size));
    all.truncate(LARGE_FILE_LIMIT);
    all
}

fn sweep_volume(
    root: &Path,
    skip_dirs: &Arc<HashSet<String>>,
    cancel: &CancelFlag,
) -> Vec<FileRecord> {
    let options = WalkOptions::with_depth(LARGE_FILE_MAX_DEPTH)
        .skip_dirs(Arc::clone(skip_dirs))
        .skip_dollar_prefixed()
        .parallel();
    walker::walk(root, &options, cancel)
        .filter(|f| f.size >= LARGE_FILE_MIN_BYTES)
        .collect()
}

/// Handle to a junk scan running on a background thread.
pub struct JunkScanHandle {
    /// Drain this to receive batches, progress, and the terminal event.
    pub events: Receiver<JunkScanEvent>,
    cancel: CancelFlag,
    _thread: Option<thread::JoinHandle<()>>,
}

impl JunkScanHandle {
    /// Request cancellation. Never blocks; the scan winds down at its
    /// next poll point and still sends a terminal event.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Start a junk scan over the static category registry and all
/// eligible volumes on a background thread.
pub fn start_junk_scan() -> JunkScanHandle {
    let (tx, rx) = crossbeam_channel::bounded(EVENT_CHANNEL_CAPACITY);
    let cancel = CancelFlag::new();
    let scan_cancel = cancel.clone();

    let thread = thread::Builder::new()
        .name("junksweep-scan".into())
        .spawn(move || {
            let volumes = platform::eligible_scan_roots();
            info!("starting junk scan over {} volume(s)", volumes.len());
            let skip = walker::system_skip_dirs();
            run_junk_scan(junk_categories(), &volumes, &skip, &scan_cancel, &mut |event| {
                let _ = tx.send(event);
            });
        })
        .expect("failed to spawn scan thread");

    JunkScanHandle {
        events: rx,
        cancel,
        _thread: Some(thread),
    }
}
