/// Volume enumeration — which mount points the large-file sweep may
/// scan.
///
/// On Windows this walks the logical drive list via the Win32 API; on
/// other platforms the filesystem root is reported as a single fixed
/// volume so the engine (and its tests) behave everywhere.
use serde::Serialize;
use std::path::PathBuf;

/// A mounted volume.
#[derive(Debug, Clone, Serialize)]
pub struct VolumeInfo {
    /// Mount point, e.g. `C:\`.
    pub root: PathBuf,
    pub kind: VolumeKind,
    pub total_bytes: u64,
    pub free_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VolumeKind {
    Fixed,
    Removable,
    Network,
    Optical,
    Unknown,
}

impl VolumeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Fixed => "Fixed",
            Self::Removable => "Removable",
            Self::Network => "Network",
            Self::Optical => "Optical",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether a whole-volume scan makes sense on this medium. Optical
    /// media are read-only (nothing to clean); network and unknown
    /// volumes are excluded for latency and safety.
    pub fn is_scannable(self) -> bool {
        matches!(self, Self::Fixed | Self::Removable)
    }
}

/// Roots the large-file sweep should cover.
pub fn eligible_scan_roots() -> Vec<PathBuf> {
    enumerate_volumes()
        .into_iter()
        .filter(|v| v.kind.is_scannable())
        .map(|v| v.root)
        .collect()
}

#[cfg(windows)]
pub fn enumerate_volumes() -> Vec<VolumeInfo> {
    use std::ffi::OsString;
    use std::os::windows::ffi::OsStringExt;
    use windows::core::PCWSTR;
    use windows::Win32::Storage::FileSystem::{
        GetDiskFreeSpaceExW, GetDriveTypeW, GetLogicalDriveStringsW,
    };

    // GetDriveTypeW return values.
    const DRIVE_REMOVABLE: u32 = 2;
    const DRIVE_FIXED: u32 = 3;
    const DRIVE_REMOTE: u32 = 4;
    const DRIVE_CDROM: u32 = 5;

    let mut buffer = [0u16; 512];
    let len = unsafe { GetLogicalDriveStringsW(Some(&mut buffer)) };
    if len == 0 {
        tracing::warn!("GetLogicalDriveStringsW failed; no volumes will be scanned");
        return Vec::new();
    }

    // The buffer is a null-separated list of drive roots ("C:\", ...).
    let list = OsString::from_wide(&buffer[..len as usize]);
    let list = list.to_string_lossy();

    let mut volumes = Vec::new();
    for root in list.split('\0').filter(|s| !s.is_empty()) {
        let wide: Vec<u16> = root.encode_utf16().chain(std::iter::once(0)).collect();
        let root_ptr = PCWSTR(wide.as_ptr());

        let kind = match unsafe { GetDriveTypeW(root_ptr) } {
            DRIVE_FIXED => VolumeKind::Fixed,
            DRIVE_REMOVABLE => VolumeKind::Removable,
            DRIVE_REMOTE => VolumeKind::Network,
            DRIVE_CDROM => VolumeKind::Optical,
            _ => VolumeKind::Unknown,
        };

        let mut free: u64 = 0;
        let mut total: u64 = 0;
        let space_ok = unsafe {
            GetDiskFreeSpaceExW(root_ptr, Some(&mut free), Some(&mut total), None).is_ok()
        };
        if !space_ok {
            // Media may be absent (empty card reader); still report the
            // volume so the front end can show it, with zero sizes.
            free = 0;
            total = 0;
        }

        volumes.push(VolumeInfo {
            root: PathBuf::from(root),
            kind,
            total_bytes: total,
            free_bytes: free,
        });
    }

    volumes
}

#[cfg(not(windows))]
pub fn enumerate_volumes() -> Vec<VolumeInfo> {
    vec![VolumeInfo {
        root: PathBuf::from("/"),
        kind: VolumeKind::Fixed,
        total_bytes: 0,
        free_bytes: 0,
    }]
}
