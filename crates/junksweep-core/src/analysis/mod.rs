/// Post-scan analysis algorithms.
pub mod duplicates;

pub use duplicates::{find_duplicates, DuplicateGroup};
