/// Cancellable, depth-bounded directory traversal — the primitive
/// underneath every scan in this crate.
///
/// Built on `jwalk`'s rayon-backed walker. Each call to [`walk`] is a
/// fresh traversal producing a lazy, finite sequence of [`FileRecord`]s;
/// the sequence is not restartable mid-iteration. Guarantees:
///
/// - symbolic links and reparse points are never followed, so cycles
///   are impossible;
/// - entries whose name is in the skip set are pruned — directories
///   are not descended into and files (hibernation/swap files by name)
///   are not reported; with [`WalkOptions::skip_dollar_prefixed`] any
///   `$`-prefixed name is pruned as well;
/// - per-entry failures (permission denied, entry vanished mid-scan)
///   are logged at debug level and skipped, never aborting the walk;
/// - the cancel flag is polled before descending into each directory
///   and before each yielded record — zero records are emitted after
///   the flag is observed set;
/// - no ordering across entries is guaranteed.
use crate::model::FileRecord;
use crate::scanner::CancelFlag;
use compact_str::CompactString;
use jwalk::Parallelism;
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, LazyLock};
use tracing::debug;

/// Configuration for one [`walk`] invocation.
#[derive(Clone)]
pub struct WalkOptions {
    /// Maximum directory levels to descend below the root. Files inside
    /// a directory at the limit level are still reported.
    pub max_depth: usize,
    /// Directory/file names pruned from the traversal (exact,
    /// case-sensitive match on the name component).
    pub skip_dirs: Arc<HashSet<String>>,
    /// Also prune any entry whose name starts with `$`. NTFS service
    /// directories (`$Recycle.Bin`, `$GetCurrent`, ...) come and go
    /// with OS servicing, so whole-volume sweeps cannot rely on an
    /// enumerated list alone.
    pub skip_dollar_prefixed: bool,
    /// Walk with a dedicated rayon pool instead of serially. Worth it
    /// for whole-volume sweeps; overkill for small app directories.
    pub parallel: bool,
}

impl WalkOptions {
    /// Serial walk with no skip set and the given depth bound.
    pub fn with_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            skip_dirs: Arc::new(HashSet::new()),
            skip_dollar_prefixed: false,
            parallel: false,
        }
    }

    /// Serial walk with no skip set and no depth bound.
    pub fn unbounded() -> Self {
        Self::with_depth(usize::MAX)
    }

    pub fn skip_dirs(mut self, skip: Arc<HashSet<String>>) -> Self {
        self.skip_dirs = skip;
        self
    }

    pub fn skip_dollar_prefixed(mut self) -> Self {
        self.skip_dollar_prefixed = true;
        self
    }

    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }
}

/// Well-known system locations excluded from whole-volume scans — OS
/// directories, service directories, and the hibernation/swap files.
pub fn system_skip_dirs() -> Arc<HashSet<String>> {
    static SKIP: LazyLock<Arc<HashSet<String>>> = LazyLock::new(|| {
        Arc::new(
            [
                "Windows",
                "System Volume Information",
                "$Recycle.Bin",
                "$WinREAgent",
                "$SysReset",
                "$Windows.~BT",
                "$Windows.~WS",
                "Recovery",
                "ProgramData",
                "AppData",
                "Boot",
                "hiberfil.sys",
                "pagefile.sys",
                "swapfile.sys",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        )
    });
    Arc::clone(&SKIP)
}

/// Walk `root`, lazily yielding a [`FileRecord`] per regular file.
///
/// An unreachable root produces an empty sequence, matching the
/// skip-dont-fail policy of every scan built on this primitive.
pub fn walk(
    root: &Path,
    options: &WalkOptions,
    cancel: &CancelFlag,
) -> impl Iterator<Item = FileRecord> {
    let skip = Arc::clone(&options.skip_dirs);
    let skip_dollar = options.skip_dollar_prefixed;
    let prune_cancel = cancel.clone();
    let emit_cancel = cancel.clone();

    let parallelism = if options.parallel {
        Parallelism::RayonNewPool(num_cpus::get())
    } else {
        Parallelism::Serial
    };

    // jwalk counts depth in entries below the root (a file directly in
    // the root is at depth 1), so the directory-level bound maps to +1:
    // files inside a directory at the limit level are still visited.
    let entry_depth = options.max_depth.saturating_add(1);

    jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .max_depth(entry_depth)
        .parallelism(parallelism)
        .process_read_dir(move |_depth, dir_path, _state, children| {
            if prune_cancel.is_cancelled() {
                children.clear();
                return;
            }
            children.retain(|entry| match entry {
                Ok(e) => {
                    let name = e.file_name.to_string_lossy();
                    !skip.contains(name.as_ref())
                        && !(skip_dollar && name.starts_with('$'))
                }
                Err(err) => {
                    debug!(
                        "skipping unreadable entry under {}: {err}",
                        dir_path.display()
                    );
                    false
                }
            });
        })
        .into_iter()
        .take_while(move |_| !emit_cancel.is_cancelled())
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                debug!("walk error: {err}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let path = entry.path();
            // Stat failures here are races (entry deleted mid-scan) or
            // permission edges; the entry is dropped, not the walk.
            let size = match std::fs::symlink_metadata(&path) {
                Ok(meta) => meta.len(),
                Err(err) => {
                    debug!("skipping {}: {err}", path.display());
                    return None;
                }
            };
            let name = CompactString::new(entry.file_name().to_string_lossy());
            Some(FileRecord { path, name, size })
        })
}
