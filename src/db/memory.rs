//! In-process snapshot storage for tests and offline runs.

use crate::db::{PersistError, RetryPolicy, SnapshotStore};
use crate::models::Snapshot;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Snapshot store holding the serialized JSON in memory.
///
/// Keeps every successful write so tests can check ordering, and can be
/// told to reject the next N writes.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slot: Mutex<Option<String>>,
    history: Mutex<Vec<Snapshot>>,
    failing_writes: AtomicU32,
    attempts: AtomicUsize,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw stored content, which need not be valid JSON.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
            ..Self::default()
        }
    }

    /// Reject the next `count` writes.
    pub fn fail_next_writes(&self, count: u32) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    /// Snapshots successfully written, oldest first.
    pub fn history(&self) -> Vec<Snapshot> {
        self.history
            .lock()
            .map(|h| h.clone())
            .unwrap_or_default()
    }

    /// Number of write attempts, including rejected ones.
    pub fn write_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn read(&self) -> Result<Option<Snapshot>, PersistError> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| PersistError::Rejected("snapshot slot poisoned".to_string()))?;

        match slot.as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn write(&self, snapshot: &Snapshot) -> Result<(), PersistError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let rejected = self
            .failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if rejected {
            return Err(PersistError::Rejected("simulated write failure".to_string()));
        }

        let json = serde_json::to_string(snapshot)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| PersistError::Rejected("snapshot slot poisoned".to_string()))?;
        *slot = Some(json);

        if let Ok(mut history) = self.history.lock() {
            history.push(snapshot.clone());
        }
        Ok(())
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            initial_backoff: Duration::from_millis(1),
            ..RetryPolicy::default()
        }
    }
}
