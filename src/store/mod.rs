// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application state store.
//!
//! Holds the session user and the activity list, applies every change
//! through [`reducer::reduce`], and queues the full snapshot for the
//! persistence writer after each change:
//! 1. Mint ids/timestamps for the operation
//! 2. Reduce the current snapshot under the channel lock
//! 3. Queue the new snapshot before releasing the lock
//! 4. Wake subscribers
//!
//! Because steps 2 and 3 share one lock, the writer task sees snapshots
//! in the order mutations were applied. The writer owns all retries, so
//! a failing disk never holds the lock or stalls an async worker.

pub mod ids;
pub mod reducer;

use crate::db::{self, SnapshotStore};
use crate::models::{Activity, Credentials, NewActivity, Snapshot, User};
use crate::time_utils::now_utc_millis;
use reducer::{reduce, Action};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// Cloneable handle to the application state.
///
/// The composition root creates one and hands clones to every consumer.
#[derive(Clone)]
pub struct DataStore {
    inner: Arc<Inner>,
}

struct Inner {
    state: watch::Sender<Snapshot>,
    persistence: Arc<dyn SnapshotStore>,
    writes: mpsc::UnboundedSender<WriteRequest>,
}

enum WriteRequest {
    Save(Snapshot),
    Flush(oneshot::Sender<()>),
}

impl DataStore {
    /// Create an empty store backed by `persistence`. Nothing is loaded.
    ///
    /// Spawns the persistence writer, so this must run inside a Tokio
    /// runtime. The writer exits once every handle is dropped.
    pub fn new(persistence: Arc<dyn SnapshotStore>) -> Self {
        let (writes, requests) = mpsc::unbounded_channel();
        tokio::spawn(write_behind(Arc::clone(&persistence), requests));

        Self {
            inner: Arc::new(Inner {
                state: watch::Sender::new(Snapshot::default()),
                persistence,
                writes,
            }),
        }
    }

    /// Create a store and hydrate it from `persistence`.
    pub fn open(persistence: Arc<dyn SnapshotStore>) -> Self {
        let store = Self::new(persistence);
        store.hydrate();
        store
    }

    /// Replace in-memory state with the stored snapshot, if there is one.
    ///
    /// Returns `true` if a snapshot was restored.
    pub fn hydrate(&self) -> bool {
        match self.inner.persistence.load() {
            Some(snapshot) => {
                tracing::info!(
                    activities = snapshot.activities.len(),
                    logged_in = snapshot.user.is_some(),
                    "Hydrated state from storage"
                );
                self.dispatch(Action::Init(snapshot));
                true
            }
            None => {
                tracing::info!("No stored state, starting empty");
                false
            }
        }
    }

    // ─── Reads ───────────────────────────────────────────────────

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    pub fn activities(&self) -> Vec<Activity> {
        self.inner.state.borrow().activities.clone()
    }

    /// Watch for changes. The receiver always holds the latest snapshot;
    /// intermediate snapshots may be skipped by slow readers.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.inner.state.subscribe()
    }

    // ─── Session ─────────────────────────────────────────────────

    /// Start a local session for `credentials.email`.
    ///
    /// The password is not checked; a new user id is minted every time.
    pub fn signup(&self, credentials: &Credentials) -> User {
        self.start_session(&credentials.email)
    }

    /// Same as [`signup`](Self::signup): credentials are not verified.
    pub fn login(&self, credentials: &Credentials) -> User {
        self.start_session(&credentials.email)
    }

    fn start_session(&self, email: &str) -> User {
        let user = User {
            id: ids::generate_id(),
            email: email.to_string(),
        };
        tracing::info!(user_id = %user.id, "Session started");
        self.dispatch(Action::SetUser(user.clone()));
        user
    }

    /// Clear the session user. Activities are kept.
    pub fn logout(&self) {
        tracing::info!("Session cleared");
        self.dispatch(Action::Logout);
    }

    // ─── Activities ──────────────────────────────────────────────

    /// Store a new activity at the front of the list and return it.
    pub fn add_activity(&self, activity: NewActivity) -> Activity {
        let record = activity.into_activity(ids::generate_id(), now_utc_millis());
        tracing::debug!(activity_id = %record.id, "Adding activity");
        self.dispatch(Action::AddActivity(record.clone()));
        record
    }

    /// Replace the activity with the same id. Unknown ids are ignored.
    pub fn update_activity(&self, activity: Activity) {
        tracing::debug!(activity_id = %activity.id, "Updating activity");
        self.dispatch(Action::UpdateActivity(activity));
    }

    /// Remove the activity with `id`. Unknown ids are ignored.
    pub fn delete_activity(&self, id: &str) {
        tracing::debug!(activity_id = id, "Deleting activity");
        self.dispatch(Action::DeleteActivity(id.to_string()));
    }

    /// Wait until every snapshot queued so far has been written or dropped.
    pub async fn flush(&self) {
        let (done, finished) = oneshot::channel();
        if self.inner.writes.send(WriteRequest::Flush(done)).is_ok() {
            let _ = finished.await;
        }
    }

    fn dispatch(&self, action: Action) {
        let writes = &self.inner.writes;
        self.inner.state.send_modify(|state| {
            *state = reduce(state, action);
            if writes.send(WriteRequest::Save(state.clone())).is_err() {
                tracing::warn!("Persistence writer is gone; change not saved");
            }
        });
    }
}

/// Drain queued snapshots in order, one write (with retries) at a time.
async fn write_behind(
    persistence: Arc<dyn SnapshotStore>,
    mut requests: mpsc::UnboundedReceiver<WriteRequest>,
) {
    while let Some(request) = requests.recv().await {
        match request {
            WriteRequest::Save(snapshot) => db::save(&persistence, snapshot).await,
            WriteRequest::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("Persistence writer stopped");
}
