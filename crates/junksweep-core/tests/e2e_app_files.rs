/// End-to-end tests for the per-application file correlator, run
/// against real fixture trees with an injected directory layout so the
/// well-known Windows bases are not required.
use junksweep_core::classify::Category;
use junksweep_core::model::AppDescriptor;
use junksweep_core::scanner::app_files::{
    scan_app_files, start_app_file_scan, AppScanEvent, CorrelatorConfig, APP_SCAN_MAX_DEPTH,
};
use junksweep_core::scanner::CancelFlag;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn write_bytes(path: &Path, n: usize) {
    fs::write(path, vec![0u8; n]).unwrap();
}

fn config(search: Vec<PathBuf>, shortcuts: Vec<PathBuf>) -> CorrelatorConfig {
    CorrelatorConfig {
        search_bases: search,
        shortcut_bases: shortcuts,
        max_depth: APP_SCAN_MAX_DEPTH,
        skip_dirs: Arc::new(HashSet::new()),
    }
}

fn app(name: &str, install: &Path) -> AppDescriptor {
    AppDescriptor {
        name: name.to_owned(),
        install_location: install.to_string_lossy().into_owned(),
        ..Default::default()
    }
}

/// Fixture:
///
/// ```text
/// base/
///   supertool/            <- keyword match for "SuperTool"
///     readme.txt
///     bin/                <- declared install location
///       tool.exe
///   unrelated/
///     noise.txt
/// ```
fn build_overlap_tree(base: &Path) -> (PathBuf, PathBuf) {
    let matched = base.join("supertool");
    let install = matched.join("bin");
    fs::create_dir_all(&install).unwrap();
    fs::create_dir_all(base.join("unrelated")).unwrap();
    write_bytes(&matched.join("readme.txt"), 10);
    write_bytes(&install.join("tool.exe"), 50);
    write_bytes(&base.join("unrelated").join("noise.txt"), 5);
    (matched, install)
}

/// When the install directory sits inside a keyword-matched folder,
/// every overlapping file must appear exactly once.
#[test]
fn overlapping_install_and_keyword_dirs_dedupe() {
    let tmp = TempDir::new().unwrap();
    let (_matched, install) = build_overlap_tree(tmp.path());

    let app = app("SuperTool", &install);
    let cfg = config(vec![tmp.path().to_path_buf()], vec![]);
    let files = scan_app_files(&app, &cfg, &CancelFlag::new(), &mut |_| {});

    let names: Vec<&str> = files.iter().map(|f| f.record.name.as_str()).collect();
    assert_eq!(
        names.iter().filter(|n| **n == "tool.exe").count(),
        1,
        "overlap walked twice must still yield the file once"
    );
    let set: HashSet<&str> = names.iter().copied().collect();
    assert_eq!(set, HashSet::from(["tool.exe", "readme.txt"]));
    assert!(!set.contains("noise.txt"), "unmatched folders stay out");
}

/// The declared install directory is trusted even when no keyword
/// matches its name.
#[test]
fn install_dir_walked_unconditionally() {
    let tmp = TempDir::new().unwrap();
    let install = tmp.path().join("xyz-0042");
    fs::create_dir_all(&install).unwrap();
    write_bytes(&install.join("data.dat"), 8);

    let app = app("Completely Different Name", &install);
    let cfg = config(vec![], vec![]);
    let files = scan_app_files(&app, &cfg, &CancelFlag::new(), &mut |_| {});

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].record.name.as_str(), "data.dat");
}

/// A missing or empty install location is skipped without error.
#[test]
fn absent_install_dir_is_skipped() {
    let tmp = TempDir::new().unwrap();
    let app = app("Ghost", &tmp.path().join("never_installed"));
    let cfg = config(vec![], vec![]);
    assert!(scan_app_files(&app, &cfg, &CancelFlag::new(), &mut |_| {}).is_empty());

    let app = AppDescriptor {
        name: "NoInstallField".to_owned(),
        ..Default::default()
    };
    assert!(scan_app_files(&app, &cfg, &CancelFlag::new(), &mut |_| {}).is_empty());
}

/// Results are classified as they are collected.
#[test]
fn collected_files_are_classified() {
    let tmp = TempDir::new().unwrap();
    let install = tmp.path().join("toolhome");
    fs::create_dir_all(&install).unwrap();
    write_bytes(&install.join("tool.exe"), 4);
    write_bytes(&install.join("settings.ini"), 4);
    write_bytes(&install.join("strange.zzz"), 4);

    let app = app("ToolHome", &install);
    let cfg = config(vec![], vec![]);
    let files = scan_app_files(&app, &cfg, &CancelFlag::new(), &mut |_| {});

    let by_name: std::collections::HashMap<&str, Category> = files
        .iter()
        .map(|f| (f.record.name.as_str(), f.category))
        .collect();
    assert_eq!(by_name["tool.exe"], Category::Executable);
    assert_eq!(by_name["settings.ini"], Category::Config);
    assert_eq!(by_name["strange.zzz"], Category::Other);
    assert!(files.iter().all(|f| !f.description.is_empty()));
}

/// Shortcut bases: matching files are classified directly, matching
/// directories are walked.
#[test]
fn shortcut_bases_match_by_keyword() {
    let tmp = TempDir::new().unwrap();
    let shortcuts = tmp.path().join("start_menu");
    fs::create_dir_all(shortcuts.join("SuperTool Suite")).unwrap();
    write_bytes(&shortcuts.join("SuperTool.lnk"), 2);
    write_bytes(&shortcuts.join("Other App.lnk"), 2);
    write_bytes(&shortcuts.join("SuperTool Suite").join("uninstall.lnk"), 2);

    let app = app("SuperTool", &tmp.path().join("nowhere"));
    let cfg = config(vec![], vec![shortcuts]);
    let files = scan_app_files(&app, &cfg, &CancelFlag::new(), &mut |_| {});

    let names: HashSet<&str> = files.iter().map(|f| f.record.name.as_str()).collect();
    assert_eq!(names, HashSet::from(["SuperTool.lnk", "uninstall.lnk"]));
    assert!(files.iter().all(|f| f.category == Category::Shortcut));
}

/// A pre-cancelled scan returns the empty collected-so-far list rather
/// than failing.
#[test]
fn pre_cancelled_scan_returns_empty() {
    let tmp = TempDir::new().unwrap();
    let (_, install) = build_overlap_tree(tmp.path());

    let cancel = CancelFlag::new();
    cancel.cancel();

    let app = app("SuperTool", &install);
    let cfg = config(vec![tmp.path().to_path_buf()], vec![]);
    let files = scan_app_files(&app, &cfg, &cancel, &mut |_| {});
    assert!(files.is_empty());
}

/// The background-thread handle streams per-directory progress and
/// exactly one terminal event, then closes its channel.
#[test]
fn app_scan_handle_streams_to_completion() {
    let tmp = TempDir::new().unwrap();
    let install = tmp.path().join("install");
    fs::create_dir_all(&install).unwrap();
    write_bytes(&install.join("core.exe"), 12);
    write_bytes(&install.join("notes.txt"), 6);

    // A name no real directory on the host will contain, so only the
    // install directory contributes.
    let app = app("Qqzzyx Vvwxq", &install);
    let handle = start_app_file_scan(app);

    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    let mut scanned = Vec::new();
    let mut terminal = None;

    while terminal.is_none() {
        assert!(
            std::time::Instant::now() < deadline,
            "scan did not finish within 30 s"
        );
        match handle.events.recv_timeout(Duration::from_millis(100)) {
            Ok(AppScanEvent::Scanning(dir)) => scanned.push(dir),
            Ok(event @ (AppScanEvent::Completed(_) | AppScanEvent::Cancelled(_))) => {
                terminal = Some(event);
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                panic!("channel closed before a terminal event")
            }
        }
    }

    assert!(scanned.contains(&install), "install dir must be reported");
    match terminal.unwrap() {
        AppScanEvent::Completed(files) => {
            let names: HashSet<&str> = files.iter().map(|f| f.record.name.as_str()).collect();
            assert!(names.contains("core.exe"));
            assert!(names.contains("notes.txt"));
        }
        AppScanEvent::Cancelled(_) => panic!("nothing requested cancellation"),
        _ => unreachable!(),
    }

    // After the terminal event the channel must close (thread exit).
    assert!(matches!(
        handle.events.recv_timeout(Duration::from_secs(5)),
        Err(crossbeam_channel::RecvTimeoutError::Disconnected)
    ));
}

/// Progress reports each directory the correlator decides to walk.
#[test]
fn progress_reports_each_walked_dir() {
    let tmp = TempDir::new().unwrap();
    let (matched, install) = build_overlap_tree(tmp.path());

    let app = app("SuperTool", &install);
    let cfg = config(vec![tmp.path().to_path_buf()], vec![]);
    let mut walked = Vec::new();
    scan_app_files(&app, &cfg, &CancelFlag::new(), &mut |dir| {
        walked.push(dir.to_path_buf())
    });

    assert_eq!(walked, vec![install, matched]);
}
