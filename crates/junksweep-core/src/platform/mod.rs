/// Platform-specific functionality — volume enumeration.
pub mod volumes;

pub use volumes::{eligible_scan_roots, enumerate_volumes, VolumeInfo, VolumeKind};
