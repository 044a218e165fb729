//! JunkSweep — system junk scanner.
//!
//! Thin command-line front end. All scanning, classification, and
//! analysis logic lives in the `junksweep-core` crate; this binary
//! only drains scan event channels and renders results.

use anyhow::{bail, Context, Result};
use junksweep_core::analysis::find_duplicates;
use junksweep_core::model::size::{format_count, format_size};
use junksweep_core::model::{AppDescriptor, FileRecord};
use junksweep_core::platform;
use junksweep_core::scanner::app_files::{start_app_file_scan, AppScanEvent};
use junksweep_core::scanner::folder_sizes::{start_folder_size_scan, FolderSizeEvent};
use junksweep_core::scanner::junk::{start_junk_scan, JunkScanEvent};
use junksweep_core::scanner::walker::{self, WalkOptions};
use junksweep_core::scanner::CancelFlag;
use std::path::PathBuf;

const USAGE: &str = "usage: junksweep \
    [junk | sizes <root> | dupes <root> | app <name> [install-dir] | volumes] [--json]";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");
    args.retain(|a| a != "--json");

    match args.first().map(String::as_str) {
        None | Some("junk") => run_junk(json),
        Some("sizes") => run_sizes(required_root(&args)?, json),
        Some("dupes") => run_dupes(required_root(&args)?, json),
        Some("app") => run_app(&args, json),
        Some("volumes") => run_volumes(json),
        Some(other) => bail!("unknown command {other:?}\n{USAGE}"),
    }
}

fn required_root(args: &[String]) -> Result<PathBuf> {
    let root = args
        .get(1)
        .with_context(|| format!("missing <root>\n{USAGE}"))?;
    Ok(PathBuf::from(root))
}

/// Stream the full junk scan to stdout.
fn run_junk(json: bool) -> Result<()> {
    let handle = start_junk_scan();
    let mut categories = serde_json::Map::new();
    let mut large_files: Vec<FileRecord> = Vec::new();

    while let Ok(event) = handle.events.recv() {
        match event {
            JunkScanEvent::Progress { percent, label } => {
                if !json {
                    eprintln!("[{percent:>3}%] {label}");
                }
            }
            JunkScanEvent::CategoryDone { key, files } => {
                if json {
                    categories.insert(key.to_owned(), serde_json::to_value(&files)?);
                } else {
                    let bytes: u64 = files.iter().map(|f| f.size).sum();
                    println!(
                        "{key}: {} files, {}",
                        format_count(files.len() as u64),
                        format_size(bytes)
                    );
                }
            }
            JunkScanEvent::LargeFiles(files) => {
                if json {
                    large_files = files;
                } else {
                    println!("large files (>= 200 MB): {}", files.len());
                    for f in files.iter().take(20) {
                        println!("  {:>10}  {}", format_size(f.size), f.path.display());
                    }
                }
            }
            JunkScanEvent::Completed(summary) | JunkScanEvent::Cancelled(summary) => {
                if json {
                    let report = serde_json::json!({
                        "summary": summary,
                        "categories": categories,
                        "large_files": large_files,
                    });
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    println!(
                        "total junk: {} files, {}",
                        format_count(summary.junk_files),
                        format_size(summary.junk_bytes)
                    );
                }
                break;
            }
        }
    }
    Ok(())
}

/// Per-subdirectory disk usage of `root`.
fn run_sizes(root: PathBuf, json: bool) -> Result<()> {
    let handle = start_folder_size_scan(root);
    while let Ok(event) = handle.events.recv() {
        match event {
            FolderSizeEvent::Measured {
                completed, total, ..
            } => {
                if !json {
                    eprintln!("[{completed}/{total}] measured");
                }
            }
            FolderSizeEvent::Completed(results) | FolderSizeEvent::Cancelled(results) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&results)?);
                } else {
                    for entry in &results {
                        println!("{:>10}  {}", format_size(entry.bytes), entry.path.display());
                    }
                }
                break;
            }
        }
    }
    Ok(())
}

/// Duplicate groups under `root`.
fn run_dupes(root: PathBuf, json: bool) -> Result<()> {
    let records: Vec<FileRecord> =
        walker::walk(&root, &WalkOptions::unbounded(), &CancelFlag::new()).collect();
    let mut groups = find_duplicates(&records);
    groups.sort_by(|a, b| b.size.cmp(&a.size));

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else {
        for group in &groups {
            println!(
                "{} x{} ({} wasted)",
                format_size(group.size),
                group.members.len(),
                format_size(group.size * (group.members.len() as u64 - 1))
            );
            for member in &group.members {
                println!("  {}", member.path.display());
            }
        }
        println!(
            "{} duplicate group(s) among {} file(s)",
            groups.len(),
            format_count(records.len() as u64)
        );
    }
    Ok(())
}

/// Files associated with one application, by name and optional
/// declared install directory.
fn run_app(args: &[String], json: bool) -> Result<()> {
    let name = args
        .get(1)
        .with_context(|| format!("missing <name>\n{USAGE}"))?;
    let app = AppDescriptor {
        name: name.clone(),
        install_location: args.get(2).cloned().unwrap_or_default(),
        ..Default::default()
    };

    let handle = start_app_file_scan(app);
    while let Ok(event) = handle.events.recv() {
        match event {
            AppScanEvent::Scanning(dir) => {
                if !json {
                    eprintln!("scanning {}", dir.display());
                }
            }
            AppScanEvent::Completed(files) | AppScanEvent::Cancelled(files) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&files)?);
                } else {
                    for f in &files {
                        println!(
                            "{} {:>10}  {}",
                            f.icon,
                            format_size(f.record.size),
                            f.record.path.display()
                        );
                    }
                    println!("{} file(s)", format_count(files.len() as u64));
                }
                break;
            }
        }
    }
    Ok(())
}

/// List mounted volumes and their scan eligibility.
fn run_volumes(json: bool) -> Result<()> {
    let volumes = platform::enumerate_volumes();
    if json {
        println!("{}", serde_json::to_string_pretty(&volumes)?);
    } else {
        for v in &volumes {
            println!(
                "{}  {}  total {}  free {}{}",
                v.root.display(),
                v.kind.label(),
                format_size(v.total_bytes),
                format_size(v.free_bytes),
                if v.kind.is_scannable() {
                    ""
                } else {
                    "  (not scanned)"
                }
            );
        }
    }
    Ok(())
}
