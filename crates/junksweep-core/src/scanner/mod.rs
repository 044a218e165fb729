/// Scanner module — cancellable filesystem traversal and the scan
/// orchestrators built on top of it.
///
/// Every orchestrator follows the same shape: a synchronous engine
/// function that reports through a sink, and a `start_*` wrapper that
/// runs the engine on a named background thread and streams events
/// over a bounded crossbeam channel. The spawning (UI) context never
/// blocks; it drains the receiver and may request cancellation at any
/// time via the shared [`CancelFlag`].
pub mod app_files;
pub mod categories;
pub mod folder_sizes;
pub mod junk;
pub mod walker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Maximum number of events that may queue up in a scan channel before
/// the background thread briefly stalls. Scan events are coarse (one
/// per category / subdirectory / status line), so a small bound is
/// plenty while still capping memory if the consumer falls behind.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Cooperative cancellation flag shared between a scan's workers and
/// the context that started it.
///
/// The only legal mutation is the idempotent set-to-cancelled
/// transition; the flag is never cleared. This is the sole mutable
/// state shared across concurrent scan tasks, so a relaxed atomic is
/// sufficient — there is no other memory the flag's value guards.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe to call from any thread, any number
    /// of times; in-flight work stops at its next poll point.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_idempotent_and_shared() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        assert!(!flag.is_cancelled());

        clone.cancel();
        clone.cancel();
        assert!(flag.is_cancelled(), "clones must observe the same flag");
    }
}
