/// Installed-application descriptor.
///
/// Produced by an external collaborator (the Windows uninstall-registry
/// enumerator in the front end) and consumed read-only by the
/// per-application file correlator. This crate never reads the registry
/// itself.
use crate::model::size::format_size;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct AppDescriptor {
    /// Display name, e.g. "Google Chrome".
    pub name: String,
    pub publisher: String,
    pub version: String,
    /// Declared install directory; may be empty or stale.
    pub install_location: String,
    pub uninstall_command: String,
    pub quiet_uninstall_command: String,
    /// Registry `EstimatedSize` converted to bytes (0 when absent).
    pub estimated_size_bytes: u64,
    /// Registry `InstallDate`, when present and parseable.
    pub install_date: Option<NaiveDate>,
}

impl AppDescriptor {
    /// Parse a registry `InstallDate` value (`YYYYMMDD`).
    ///
    /// Returns `None` for empty or malformed values — installers write
    /// all sorts of garbage into this field.
    pub fn parse_install_date(raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw.trim(), "%Y%m%d").ok()
    }

    /// Formatted estimated size, or an empty string when unknown.
    pub fn size_display(&self) -> String {
        if self.estimated_size_bytes > 0 {
            format_size(self.estimated_size_bytes)
        } else {
            String::new()
        }
    }
}
