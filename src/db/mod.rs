//! Durable local storage for the state snapshot.
//!
//! Adapters implement raw, blocking `read`/`write`. On top of that,
//! `load` never fails (anything unreadable counts as a fresh install) and
//! [`save`] never reports back (failed writes are retried, logged, then
//! dropped). `save` runs the blocking write off the async workers.

pub mod file;
pub mod memory;

pub use file::FileSnapshotStore;
pub use memory::MemorySnapshotStore;

use crate::models::Snapshot;
use std::sync::Arc;
use std::time::Duration;

/// Fixed application identifier the snapshot is stored under.
pub const STORAGE_KEY: &str = "activity-tracker-data";

/// Errors raised by snapshot adapters.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt snapshot: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Write rejected: {0}")]
    Rejected(String),
}

/// How many times a failed write is attempted, and how long to wait between.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(25),
        }
    }
}

/// Persistent store adapter.
pub trait SnapshotStore: Send + Sync {
    /// Read the stored snapshot, `Ok(None)` if nothing was ever saved.
    fn read(&self) -> Result<Option<Snapshot>, PersistError>;

    /// Durably replace the stored snapshot.
    fn write(&self, snapshot: &Snapshot) -> Result<(), PersistError>;

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
    }

    /// Load the stored snapshot, treating unreadable data as absent.
    fn load(&self) -> Option<Snapshot> {
        match self.read() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable snapshot; starting fresh");
                None
            }
        }
    }
}

/// Write `snapshot` through `store`, retrying with backoff.
///
/// The last write may be lost if the process dies while it is in flight.
pub async fn save<S>(store: &Arc<S>, snapshot: Snapshot)
where
    S: SnapshotStore + ?Sized + 'static,
{
    let policy = store.retry_policy();
    let snapshot = Arc::new(snapshot);
    let mut backoff = policy.initial_backoff;

    for attempt in 1..=policy.max_attempts {
        let (adapter, pending) = (Arc::clone(store), Arc::clone(&snapshot));
        let result = tokio::task::spawn_blocking(move || adapter.write(&pending))
            .await
            .unwrap_or_else(|e| Err(PersistError::Rejected(format!("write task failed: {}", e))));

        match result {
            Ok(()) => return,
            Err(e) if attempt < policy.max_attempts => {
                tracing::warn!(attempt, error = %e, "Snapshot write failed, retrying");
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(e) => {
                tracing::error!(
                    attempts = policy.max_attempts,
                    error = %e,
                    "Snapshot write failed, giving up"
                );
            }
        }
    }
}
