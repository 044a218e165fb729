/// Extension-driven file classification.
///
/// Maps a file path to a human-readable description, an icon token,
/// and a [`Category`]. Classification is a total function: every
/// extension not in the table degrades to [`Category::Other`] with a
/// generic description — it never fails.
///
/// For executables, libraries, and drivers the description may be
/// upgraded from the binary's own version metadata when the probe in
/// [`version_info`] succeeds; the table description is the fallback.
pub mod version_info;

use serde::Serialize;
use std::path::Path;

/// Closed category set for classified files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Executable,
    Library,
    Driver,
    Config,
    Cache,
    Log,
    Data,
    Resource,
    Shortcut,
    Archive,
    Script,
    Debug,
    Other,
}

impl Category {
    /// Display order used by front ends when grouping files.
    pub const ALL: [Category; 13] = [
        Self::Executable,
        Self::Library,
        Self::Driver,
        Self::Config,
        Self::Data,
        Self::Cache,
        Self::Log,
        Self::Resource,
        Self::Shortcut,
        Self::Archive,
        Self::Script,
        Self::Debug,
        Self::Other,
    ];

    /// Stable string key for serialisation and front-end lookup.
    pub fn key(self) -> &'static str {
        match self {
            Self::Executable => "executable",
            Self::Library => "library",
            Self::Driver => "driver",
            Self::Config => "config",
            Self::Cache => "cache",
            Self::Log => "log",
            Self::Data => "data",
            Self::Resource => "resource",
            Self::Shortcut => "shortcut",
            Self::Archive => "archive",
            Self::Script => "script",
            Self::Debug => "debug",
            Self::Other => "other",
        }
    }

    /// Human-readable group label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Executable => "Executable files (.exe)",
            Self::Library => "Libraries and components (.dll)",
            Self::Driver => "Drivers",
            Self::Config => "Settings and configuration",
            Self::Cache => "Cache and temporary files",
            Self::Log => "Event logs",
            Self::Data => "Data and databases",
            Self::Resource => "Resources (icons, fonts, images)",
            Self::Shortcut => "Shortcuts",
            Self::Archive => "Archives and installer packages",
            Self::Script => "Scripts and command files",
            Self::Debug => "Debug files",
            Self::Other => "Other files",
        }
    }

    /// Accent colour (hex) used by front ends.
    pub fn color(self) -> &'static str {
        match self {
            Self::Executable => "#e94560",
            Self::Library => "#9b59b6",
            Self::Driver => "#e74c3c",
            Self::Config => "#3498db",
            Self::Cache => "#f39c12",
            Self::Log => "#7f8c8d",
            Self::Data => "#2ecc71",
            Self::Resource => "#1abc9c",
            Self::Shortcut => "#f1c40f",
            Self::Archive => "#e67e22",
            Self::Script => "#3498db",
            Self::Debug => "#7f8c8d",
            Self::Other => "#606080",
        }
    }
}

/// Result of classifying one path.
#[derive(Debug, Clone)]
pub struct Classification {
    pub description: String,
    pub icon: &'static str,
    pub category: Category,
}

/// Fallback for extensions not in the table.
const GENERIC: (&str, &str, Category) = ("Application data file", "📄", Category::Other);

/// Extensions whose description is worth upgrading via version metadata.
const VERSIONED_EXTS: [&str; 6] = ["exe", "dll", "sys", "ocx", "ax", "drv"];

/// Classify a file path.
///
/// Pure and side-effect-free apart from the optional read-only version
/// metadata probe, which swallows every error and falls back to the
/// table description.
pub fn classify(path: &Path) -> Classification {
    let ext = file_extension(path);
    let (table_desc, icon, category) = extension_info(ext).unwrap_or(GENERIC);

    let description = if VERSIONED_EXTS.iter().any(|v| v.eq_ignore_ascii_case(ext)) {
        version_info::file_description(path).unwrap_or_else(|| table_desc.to_string())
    } else {
        table_desc.to_string()
    };

    Classification {
        description,
        icon,
        category,
    }
}

/// The substring after the last `.` of the file name, or `""`.
fn file_extension(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.rfind('.').map(|i| &n[i + 1..]))
        .unwrap_or("")
}

/// Look up an extension in the classification table.
///
/// Case-insensitive on a zero-heap-allocation hot path: the extension
/// is lowercased into a fixed-size stack buffer. Extensions longer than
/// 16 bytes cannot match anything in the table.
pub fn extension_info(ext: &str) -> Option<(&'static str, &'static str, Category)> {
    let bytes = ext.as_bytes();
    if bytes.is_empty() || bytes.len() > 16 {
        return None;
    }

    let mut lower = [0u8; 16];
    for (dest, &src) in lower.iter_mut().zip(bytes.iter()) {
        *dest = src.to_ascii_lowercase();
    }
    let ext = std::str::from_utf8(&lower[..bytes.len()]).ok()?;

    use Category::*;
    let info = match ext {
        // Executables, libraries, drivers
        "exe" => ("Executable program", "⚙", Executable),
        "com" => ("Command-line program", "⚙", Executable),
        "scr" => ("Screen saver", "⚙", Executable),
        "dll" => ("Dynamic-link library (DLL)", "📦", Library),
        "ocx" => ("ActiveX component", "📦", Library),
        "ax" => ("DirectShow filter", "📦", Library),
        "sys" => ("System driver", "🔧", Driver),
        "drv" => ("Device driver", "🔧", Driver),
        // Configuration
        "ini" => ("INI settings file", "⚙", Config),
        "cfg" | "conf" => ("Configuration file", "⚙", Config),
        "config" => (".config configuration file", "⚙", Config),
        "json" => ("JSON data / settings", "📄", Config),
        "xml" => ("XML document", "📄", Config),
        "yaml" => ("YAML configuration", "📄", Config),
        "toml" => ("TOML configuration", "📄", Config),
        "reg" => ("Windows registry entries", "🔧", Config),
        "manifest" => ("Application manifest", "📄", Config),
        "plist" => ("Property list (settings)", "📄", Config),
        // Cache / temporary
        "tmp" | "temp" => ("Temporary file", "🗑", Cache),
        "dmp" => ("Memory dump (crash dump)", "🗑", Cache),
        "bak" => ("Backup copy", "🗑", Cache),
        "old" => ("Outdated file", "🗑", Cache),
        "cache" => ("Cache file", "💾", Cache),
        // Logs
        "log" => ("Event log", "📋", Log),
        "trace" => ("Trace file", "📋", Log),
        "etl" => ("ETW trace log (Windows)", "📋", Log),
        // Data / databases
        "db" => ("Database", "💾", Data),
        "sqlite" | "sqlite3" => ("SQLite database", "💾", Data),
        "mdb" => ("Access database", "💾", Data),
        "dat" => ("Application data file", "💾", Data),
        "bin" => ("Binary data file", "💾", Data),
        // Resources
        "ico" => ("Windows icon", "🖼", Resource),
        "png" => ("PNG image", "🖼", Resource),
        "jpg" | "jpeg" => ("JPEG image", "🖼", Resource),
        "bmp" => ("Bitmap image", "🖼", Resource),
        "svg" => ("SVG vector image", "🖼", Resource),
        "gif" => ("GIF animated image", "🖼", Resource),
        "webp" => ("WebP image", "🖼", Resource),
        "ttf" => ("TrueType font", "🔤", Resource),
        "otf" => ("OpenType font", "🔤", Resource),
        "woff" => ("WOFF web font", "🔤", Resource),
        "woff2" => ("WOFF2 web font", "🔤", Resource),
        "eot" => ("Embedded EOT font", "🔤", Resource),
        "pak" => ("Browser/Chromium resource pack", "📦", Resource),
        "rsrc" => ("Application resources", "📦", Resource),
        "mui" => ("MUI interface resources", "🔤", Resource),
        // Shortcuts
        "lnk" => ("Windows shortcut", "🔗", Shortcut),
        "url" => ("Internet shortcut", "🔗", Shortcut),
        // Archives and installers
        "zip" => ("ZIP archive", "📦", Archive),
        "7z" => ("7-Zip archive", "📦", Archive),
        "rar" => ("RAR archive", "📦", Archive),
        "cab" => ("Windows cabinet archive", "📦", Archive),
        "msi" => ("Windows Installer package (MSI)", "📦", Archive),
        // Scripts
        "bat" => ("Batch file", "⚙", Script),
        "cmd" => ("Windows command file", "⚙", Script),
        "ps1" => ("PowerShell script", "⚙", Script),
        "vbs" => ("VBScript script", "⚙", Script),
        "js" => ("JavaScript file", "📄", Script),
        "py" => ("Python script", "📄", Script),
        // Debug artefacts
        "pdb" => ("Debug symbols (PDB)", "🔧", Debug),
        "map" => ("Source map file", "🔧", Debug),
        _ => return None,
    };
    Some(info)
}
