/// Data model for JunkSweep scan results.
pub mod app;
pub mod record;
pub mod size;

pub use app::AppDescriptor;
pub use record::{ClassifiedFileRecord, FileRecord};
