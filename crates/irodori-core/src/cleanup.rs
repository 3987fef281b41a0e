//! Chunked scene teardown.
//!
//! [`CleanupTask`] retires every registered representor in bounded
//! chunks, suspending between chunks so per-tick work stays flat, then
//! clears the registry, rewinds the pool cursor, and fires the
//! cleanup-complete event.
//!
//! The set of handles to retire is snapshotted when the task is built:
//! cleanup owns the registry for its whole run (the scene cancels any
//! in-flight scan before starting one), so the snapshot cannot go
//! stale.

use crate::events::Observers;
use crate::pool::{RepresentorId, RepresentorPool, RetireMode};
use crate::registry::ColorRegistry;

/// Outcome of one [`CleanupTask::resume`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupStatus {
    /// A chunk was retired; resume again next tick.
    InProgress,
    /// Everything is retired and scene state is reset. The task is
    /// spent.
    Complete,
}

/// Resumable teardown of all registered representors.
pub struct CleanupTask {
    ids: Vec<RepresentorId>,
    index: usize,
    chunk_size: usize,
    mode: RetireMode,
}

impl CleanupTask {
    /// Snapshot the registered handles and size the chunks:
    /// `max(registered / divisor, 1)` handles per resume.
    #[must_use]
    pub fn new(registry: &ColorRegistry, divisor: usize, mode: RetireMode) -> Self {
        let ids = registry.ids();
        let chunk_size = (ids.len() / divisor.max(1)).max(1);
        log::debug!(
            "cleanup started: {} handles, chunk size {chunk_size}",
            ids.len(),
        );
        Self {
            ids,
            index: 0,
            chunk_size,
            mode,
        }
    }

    /// Handles retired so far.
    #[must_use]
    pub const fn retired(&self) -> usize {
        self.index
    }

    /// Retire up to one chunk of handles.
    ///
    /// On the final chunk this also clears the registry, rewinds the
    /// pool cursor, and emits the cleanup-complete event.
    pub fn resume(
        &mut self,
        pool: &mut RepresentorPool,
        registry: &mut ColorRegistry,
        observers: &mut Observers,
    ) -> CleanupStatus {
        let end = (self.index + self.chunk_size).min(self.ids.len());
        while self.index < end {
            if let Some(handle) = pool.get_mut(self.ids[self.index]) {
                handle.retire(self.mode);
            }
            self.index += 1;
        }

        if self.index < self.ids.len() {
            return CleanupStatus::InProgress;
        }

        registry.clear();
        pool.reset_cursor();
        observers.emit_cleanup_complete();
        CleanupStatus::Complete
    }
}
