/// Per-application file correlation — finds the files on disk that
/// belong to an installed application.
///
/// The declared install directory is always trusted and walked
/// unconditionally. Beyond that, association is a keyword heuristic:
/// the application's name and publisher are tokenised and matched by
/// case-insensitive substring against folder and shortcut names under
/// a fixed set of well-known bases. The heuristic is inherently
/// imprecise — a folder sharing a common word with an unrelated app
/// will over-match, and stylised app names can under-match. Front ends
/// must present the result as candidates for review, never as a list
/// that is safe to delete blindly.
use crate::classify;
use crate::model::{AppDescriptor, ClassifiedFileRecord, FileRecord};
use crate::scanner::walker::{self, WalkOptions};
use crate::scanner::{CancelFlag, EVENT_CHANNEL_CAPACITY};
use crossbeam_channel::Receiver;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use std::thread;
use tracing::{debug, info};

/// Depth bound for every walk the correlator performs.
pub const APP_SCAN_MAX_DEPTH: usize = 12;

/// Articles and legal-entity suffixes that carry no identity.
const STOP_WORDS: [&str; 9] = [
    "the", "for", "and", "app", "com", "inc", "ltd", "llc", "corp",
];

/// Where the correlator looks, beyond the install directory.
pub struct CorrelatorConfig {
    /// Bases whose immediate subdirectories are matched by keyword and
    /// walked in full on a hit.
    pub search_bases: Vec<PathBuf>,
    /// Bases enumerated for keyword-matched shortcut files and folders.
    pub shortcut_bases: Vec<PathBuf>,
    pub max_depth: usize,
    pub skip_dirs: Arc<HashSet<String>>,
}

impl Default for CorrelatorConfig {
    /// The well-known user and program directories of a Windows
    /// installation, resolved through environment variables where the
    /// location is per-user.
    fn default() -> Self {
        let local = std::env::var_os("LOCALAPPDATA").map(PathBuf::from);
        let roaming = std::env::var_os("APPDATA").map(PathBuf::from);
        let profile = std::env::var_os("USERPROFILE").map(PathBuf::from);

        let search_bases = [
            local.clone(),
            roaming.clone(),
            local.as_ref().map(|p| p.join("Programs")),
            local.as_ref().map(|p| p.join("Temp")),
            Some(PathBuf::from(r"C:\Program Files")),
            Some(PathBuf::from(r"C:\Program Files (x86)")),
            Some(PathBuf::from(r"C:\ProgramData")),
        ]
        .into_iter()
        .flatten()
        .collect();

        let shortcut_bases = [
            roaming.map(|p| p.join(r"Microsoft\Windows\Start Menu\Programs")),
            Some(PathBuf::from(
                r"C:\ProgramData\Microsoft\Windows\Start Menu\Programs",
            )),
            profile.map(|p| p.join("Desktop")),
            Some(PathBuf::from(r"C:\Users\Public\Desktop")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self {
            search_bases,
            shortcut_bases,
            max_depth: APP_SCAN_MAX_DEPTH,
            skip_dirs: app_skip_dirs(),
        }
    }
}

/// System locations never walked when following keyword matches.
pub fn app_skip_dirs() -> Arc<HashSet<String>> {
    static SKIP: LazyLock<Arc<HashSet<String>>> = LazyLock::new(|| {
        Arc::new(
            [
                "Windows",
                "System32",
                "SysWOW64",
                "$Recycle.Bin",
                "System Volume Information",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        )
    });
    Arc::clone(&SKIP)
}

/// Tokenise an app's name and publisher into matching keywords:
/// lowercase alphabetic tokens of length ≥ 3, stop words removed,
/// deduplicated in first-occurrence order.
pub fn derive_keywords(name: &str, publisher: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();
    for source in [name, publisher] {
        for token in source.split(|c: char| !c.is_alphabetic()) {
            if token.chars().count() < 3 {
                continue;
            }
            let token = token.to_lowercase();
            if STOP_WORDS.contains(&token.as_str()) {
                continue;
            }
            if !seen.contains(&token) {
                seen.insert(token.clone());
                keywords.push(token);
            }
        }
    }
    keywords
}

fn name_matches(name: &str, keywords: &[String]) -> bool {
    let lower = name.to_lowercase();
    keywords.iter().any(|kw| lower.contains(kw.as_str()))
}

/// Case-normalised path key for dedup — Windows paths are
/// case-insensitive, other filesystems are left alone.
fn normalize_path(path: &Path) -> String {
    let s = path.to_string_lossy();
    if cfg!(windows) {
        s.to_lowercase()
    } else {
        s.into_owned()
    }
}

/// Accumulates classified records, deduplicated first-seen by
/// normalised path so the earliest classification wins.
struct Collector {
    seen: HashSet<String>,
    files: Vec<ClassifiedFileRecord>,
}

impl Collector {
    fn new() -> Self {
        Self {
            seen: HashSet::new(),
            files: Vec::new(),
        }
    }

    fn push(&mut self, record: FileRecord) {
        let key = normalize_path(&record.path);
        if self.seen.insert(key) {
            let c = classify::classify(&record.path);
            self.files.push(ClassifiedFileRecord {
                record,
                description: c.description,
                icon: c.icon,
                category: c.category,
            });
        }
    }
}

/// Find and classify every file associated with `app`.
///
/// `on_progress` receives each directory as the correlator starts
/// walking it. Cancellation is honoured between every base/keyword
/// check and inside every walk; the collected-so-far list is returned
/// rather than an error.
pub fn scan_app_files(
    app: &AppDescriptor,
    config: &CorrelatorConfig,
    cancel: &CancelFlag,
    on_progress: &mut dyn FnMut(&Path),
) -> Vec<ClassifiedFileRecord> {
    let keywords = derive_keywords(&app.name, &app.publisher);
    debug!("correlating {:?} via keywords {keywords:?}", app.name);

    let walk_options = WalkOptions::with_depth(config.max_depth)
        .skip_dirs(Arc::clone(&config.skip_dirs));
    let mut scanned_dirs: HashSet<String> = HashSet::new();
    let mut collector = Collector::new();

    // 1 — The declared install directory is always trusted.
    let install = Path::new(&app.install_location);
    if !app.install_location.is_empty() && install.is_dir() {
        scanned_dirs.insert(normalize_path(install));
        on_progress(install);
        for record in walker::walk(install, &walk_options, cancel) {
            collector.push(record);
        }
    }

    // 2 — Keyword-matched subdirectories of the well-known bases.
    for base in &config.search_bases {
        if cancel.is_cancelled() {
            return collector.files;
        }
        if !base.is_dir() {
            continue;
        }
        let Ok(entries) = std::fs::read_dir(base) else {
            continue;
        };
        for entry in entries.filter_map(|e| e.ok()) {
            if cancel.is_cancelled() {
                return collector.files;
            }
            if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            let dir = entry.path();
            if !name_matches(&entry.file_name().to_string_lossy(), &keywords) {
                continue;
            }
            // A matched folder may be the install dir itself (or vice
            // versa); each directory is walked at most once.
            if !scanned_dirs.insert(normalize_path(&dir)) {
                continue;
            }
            on_progress(&dir);
            for record in walker::walk(&dir, &walk_options, cancel) {
                collector.push(record);
            }
        }
    }

    // 3 — Shortcut locations: matched files are classified directly,
    // matched folders are walked.
    for base in &config.shortcut_bases {
        if cancel.is_cancelled() {
            return collector.files;
        }
        if !base.is_dir() {
            continue;
        }
        let Ok(entries) = std::fs::read_dir(base) else {
            continue;
        };
        for entry in entries.filter_map(|e| e.ok()) {
            if cancel.is_cancelled() {
                return collector.files;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name_matches(&name, &keywords) {
                continue;
            }
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_file() {
                let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                collector.push(FileRecord::new(path, &name, size));
            } else if file_type.is_dir() && scanned_dirs.insert(normalize_path(&path)) {
                on_progress(&path);
                for record in walker::walk(&path, &walk_options, cancel) {
                    collector.push(record);
                }
            }
        }
    }

    collector.files
}

#[derive(Debug)]
pub enum AppScanEvent {
    /// The correlator started walking this directory.
    Scanning(PathBuf),
    Completed(Vec<ClassifiedFileRecord>),
    /// Cancelled; carries everything collected before the flag was
    /// observed.
    Cancelled(Vec<ClassifiedFileRecord>),
}

/// Handle to a per-application scan running on a background thread.
pub struct AppScanHandle {
    pub events: Receiver<AppScanEvent>,
    cancel: CancelFlag,
    _thread: Option<thread::JoinHandle<()>>,
}

impl AppScanHandle {
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

/// Start scanning for `app`'s files on a background thread using the
/// default well-known directories.
pub fn start_app_file_scan(app: AppDescriptor) -> AppScanHandle {
    let (tx, rx) = crossbeam_channel::bounded(EVENT_CHANNEL_CAPACITY);
    let cancel = CancelFlag::new();
    let scan_cancel = cancel.clone();

    let thread = thread::Builder::new()
        .name("junksweep-appscan".into())
        .spawn(move || {
            info!("scanning files for {:?}", app.name);
            let config = CorrelatorConfig::default();
            let progress_tx = tx.clone();
            let files = scan_app_files(&app, &config, &scan_cancel, &mut |dir| {
                let _ = progress_tx.send(AppScanEvent::Scanning(dir.to_path_buf()));
            });
            let terminal = if scan_cancel.is_cancelled() {
                AppScanEvent::Cancelled(files)
            } else {
                AppScanEvent::Completed(files)
            };
            let _ = tx.send(terminal);
        })
        .expect("failed to spawn app-scan thread");

    AppScanHandle {
        events: rx,
        cancel,
        _thread: Some(thread),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_drop_short_tokens_and_stop_words() {
        let kws = derive_keywords("The GIMP for Windows", "");
        assert_eq!(kws, vec!["gimp", "windows"]);
    }

    #[test]
    fn keywords_merge_name_and_publisher_dedup_first_seen() {
        let kws = derive_keywords("Chrome", "Google Chrome Inc");
        assert_eq!(kws, vec!["chrome", "google"]);
    }

    #[test]
    fn keywords_split_on_non_alphabetic() {
        let kws = derive_keywords("Visual-Studio_Code 2024", "Microsoft Corp");
        assert_eq!(kws, vec!["visual", "studio", "code", "microsoft"]);
    }

    #[test]
    fn keywords_are_lowercase_substring_matchers() {
        let kws = derive_keywords("OBS Studio", "");
        assert!(name_matches("obs-studio", &kws));
        assert!(name_matches("Obs Studio Plugins", &kws));
        assert!(!name_matches("unrelated", &kws));
    }
}
