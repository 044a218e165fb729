/// Junk-category registry — the static configuration describing every
/// named scan target of the junk scanner.
///
/// Built once on first use and never mutated. Base paths that resolve
/// through environment variables (`TEMP`, `LOCALAPPDATA`, `APPDATA`)
/// are expanded at initialisation; paths that do not exist on the
/// running system are skipped silently at scan time.
use std::path::PathBuf;
use std::sync::LazyLock;

/// One named junk-scan target.
#[derive(Debug)]
pub struct JunkCategorySpec {
    pub key: &'static str,
    pub label: &'static str,
    /// Accent colour (hex) for front-end display.
    pub color: &'static str,
    /// Directories to walk. May be empty (recycle bin — emptied by the
    /// shell collaborator, nothing for the filesystem scanner to do).
    pub base_paths: Vec<PathBuf>,
    /// Matching extensions, lowercase without the dot. Empty = any.
    pub extensions: &'static [&'static str],
    /// Matching file-name prefixes (Office lock-file convention).
    /// Empty = any.
    pub name_prefixes: &'static [&'static str],
    pub recursive: bool,
}

impl JunkCategorySpec {
    /// Extension and name-prefix filter applied to each walked file.
    pub fn matches(&self, file_name: &str) -> bool {
        let ext_ok = self.extensions.is_empty() || {
            match file_name.rfind('.') {
                Some(i) => {
                    let ext = file_name[i + 1..].to_ascii_lowercase();
                    self.extensions.contains(&ext.as_str())
                }
                None => false,
            }
        };
        let prefix_ok = self.name_prefixes.is_empty()
            || self.name_prefixes.iter().any(|p| file_name.starts_with(p));
        ext_ok && prefix_ok
    }
}

/// The fixed category list, in scan order.
pub fn junk_categories() -> &'static [JunkCategorySpec] {
    static CATEGORIES: LazyLock<Vec<JunkCategorySpec>> = LazyLock::new(build_categories);
    &CATEGORIES
}

fn build_categories() -> Vec<JunkCategorySpec> {
    vec![
        JunkCategorySpec {
            key: "temp_system",
            label: "System temporary files",
            color: "#e74c3c",
            base_paths: existing_of(vec![
                env_path("TEMP"),
                env_path("TMP"),
                fixed(r"C:\Windows\Temp"),
                fixed(r"C:\Windows\Prefetch"),
            ]),
            extensions: &["tmp", "temp", "~"],
            name_prefixes: &[],
            recursive: true,
        },
        JunkCategorySpec {
            key: "browser_cache",
            label: "Browser caches",
            color: "#e67e22",
            base_paths: existing_of(vec![
                env_join("LOCALAPPDATA", r"Google\Chrome\User Data\Default\Cache"),
                env_join("LOCALAPPDATA", r"Google\Chrome\User Data\Default\Code Cache"),
                env_join("LOCALAPPDATA", r"Microsoft\Edge\User Data\Default\Cache"),
                env_join("APPDATA", r"Mozilla\Firefox\Profiles"),
            ]),
            extensions: &[],
            name_prefixes: &[],
            recursive: true,
        },
        JunkCategorySpec {
            key: "windows_update",
            label: "Old Windows Update files",
            color: "#9b59b6",
            base_paths: existing_of(vec![
                fixed(r"C:\Windows\SoftwareDistribution\Download"),
                fixed(r"C:\Windows\SoftwareDistribution\DataStore"),
            ]),
            extensions: &[],
            name_prefixes: &[],
            recursive: true,
        },
        JunkCategorySpec {
            key: "thumbnails",
            label: "Thumbnail cache",
            color: "#1abc9c",
            base_paths: existing_of(vec![env_join(
                "LOCALAPPDATA",
                r"Microsoft\Windows\Explorer",
            )]),
            extensions: &["db"],
            name_prefixes: &[],
            recursive: false,
        },
        JunkCategorySpec {
            key: "log_files",
            label: "Log files",
            color: "#34495e",
            base_paths: existing_of(vec![
                fixed(r"C:\Windows\Logs"),
                env_join("LOCALAPPDATA", "Temp"),
            ]),
            extensions: &["log", "dmp"],
            name_prefixes: &[],
            recursive: true,
        },
        JunkCategorySpec {
            key: "recycle_bin",
            label: "Recycle bin",
            color: "#95a5a6",
            base_paths: Vec::new(),
            extensions: &[],
            name_prefixes: &[],
            recursive: false,
        },
        JunkCategorySpec {
            key: "office_temp",
            label: "Office temporary files",
            color: "#2980b9",
            base_paths: existing_of(vec![env_path("TEMP")]),
            extensions: &["tmp"],
            name_prefixes: &["~$", "~WRL"],
            recursive: false,
        },
    ]
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn env_join(var: &str, tail: &str) -> Option<PathBuf> {
    env_path(var).map(|base| base.join(tail))
}

fn fixed(path: &str) -> Option<PathBuf> {
    Some(PathBuf::from(path))
}

fn existing_of(candidates: Vec<Option<PathBuf>>) -> Vec<PathBuf> {
    candidates.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_keys_are_unique_and_ordered() {
        let cats = junk_categories();
        assert!(!cats.is_empty());
        let mut keys = std::collections::HashSet::new();
        for cat in cats {
            assert!(keys.insert(cat.key), "duplicate category key {}", cat.key);
            assert!(!cat.label.is_empty());
            assert!(cat.color.starts_with('#'));
        }
        // Fixed scan order with temp files first.
        assert_eq!(cats[0].key, "temp_system");
    }

    #[test]
    fn extension_filter_matches() {
        let spec = JunkCategorySpec {
            key: "t",
            label: "t",
            color: "#000000",
            base_paths: Vec::new(),
            extensions: &["tmp", "temp"],
            name_prefixes: &[],
            recursive: true,
        };
        assert!(spec.matches("a.tmp"));
        assert!(spec.matches("A.TMP"));
        assert!(spec.matches("b.temp"));
        assert!(!spec.matches("c.txt"));
        assert!(!spec.matches("no_extension"));
    }

    #[test]
    fn empty_extension_set_matches_all() {
        let spec = JunkCategorySpec {
            key: "t",
            label: "t",
            color: "#000000",
            base_paths: Vec::new(),
            extensions: &[],
            name_prefixes: &[],
            recursive: true,
        };
        assert!(spec.matches("anything.xyz"));
        assert!(spec.matches("no_extension"));
    }

    #[test]
    fn name_prefix_filter() {
        let spec = JunkCategorySpec {
            key: "office_temp",
            label: "t",
            color: "#000000",
            base_paths: Vec::new(),
            extensions: &["tmp"],
            name_prefixes: &["~$", "~WRL"],
            recursive: false,
        };
        assert!(spec.matches("~$report.tmp"));
        assert!(spec.matches("~WRL0001.tmp"));
        assert!(!spec.matches("report.tmp"));
        assert!(!spec.matches("~$report.docx"));
    }
}
