//! JunkSweep core: scanning, classification, and analysis engine.
//!
//! This crate contains all business logic with zero UI dependencies.
//! Every long-running operation streams results from a background thread
//! and honours a cooperative [`scanner::CancelFlag`]. Nothing here ever
//! deletes a file; the engine only produces lists for a front end to
//! act on.
//!
//! # Modules
//!
//! - [`model`]: file records, application descriptors, size formatting.
//! - [`classify`]: extension-driven file classification.
//! - [`scanner`]: cancellable traversal plus the junk, folder-size, and
//!   per-application scan orchestrators.
//! - [`analysis`]: post-scan algorithms (duplicate detection).
//! - [`platform`]: volume enumeration.

pub mod analysis;
pub mod classify;
pub mod model;
pub mod platform;
pub mod scanner;
