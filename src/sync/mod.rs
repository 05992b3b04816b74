//! Upload of completed work sessions to the stats server.
//!
//! Uploads are fire-and-forget: [`SessionSync::submit`] returns immediately
//! and failures are only logged. There is no retry and no offline queue.

mod client;
pub mod error;

use std::sync::Mutex;

use tracing::debug;

pub use client::HttpSessionSync;
pub use error::SyncError;

use crate::types::SessionRecord;

/// Sync gateway used by the session controller.
pub trait SessionSync: Send + Sync {
    /// Schedules an upload of `record` without waiting for it.
    fn submit(&self, record: SessionRecord);
}

/// Sync gateway for running without a server.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSessionSync;

impl SessionSync for NoopSessionSync {
    fn submit(&self, record: SessionRecord) {
        debug!("Sync disabled, dropping record ending at {}", record.end_ts);
    }
}

/// Mock sync gateway for testing.
#[derive(Debug, Default)]
pub struct MockSessionSync {
    records: Mutex<Vec<SessionRecord>>,
}

impl MockSessionSync {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every submitted record in order.
    #[must_use]
    pub fn records(&self) -> Vec<SessionRecord> {
        self.lock().clone()
    }

    #[must_use]
    pub fn submit_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SessionRecord>> {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SessionSync for MockSessionSync {
    fn submit(&self, record: SessionRecord) {
        self.lock().push(record);
    }
}
