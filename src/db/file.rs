// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed snapshot storage.
//!
//! The snapshot lives in a single JSON file named after [`STORAGE_KEY`]
//! inside the configured data directory. Each write goes to a temp file
//! that is fsynced and then renamed over the old snapshot, so a reader
//! sees either the previous snapshot or the new one.

use crate::db::{PersistError, SnapshotStore, STORAGE_KEY};
use crate::models::Snapshot;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Snapshot store writing one JSON file per application.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
    temp_path: PathBuf,
}

impl FileSnapshotStore {
    /// Open the store, creating the data directory if needed.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, PersistError> {
        let dir = data_dir.as_ref();
        fs::create_dir_all(dir)?;

        let path = dir.join(format!("{STORAGE_KEY}.json"));
        tracing::info!(path = %path.display(), "Opened snapshot store");

        Ok(Self {
            temp_path: dir.join(format!(".{STORAGE_KEY}.json.tmp")),
            path,
        })
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn read(&self) -> Result<Option<Snapshot>, PersistError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(serde_json::from_str(&json)?))
    }

    fn write(&self, snapshot: &Snapshot) -> Result<(), PersistError> {
        let json = serde_json::to_string(snapshot)?;

        let mut file = File::create(&self.temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&self.temp_path, &self.path)?;

        tracing::debug!(
            activities = snapshot.activities.len(),
            "Snapshot written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, User};
    use tempfile::TempDir;

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            user: Some(User {
                id: "k3j9x0a".to_string(),
                email: "a@x.com".to_string(),
            }),
            activities: vec![Activity {
                id: "p0q1r2s".to_string(),
                activity_type: "swim".to_string(),
                date: "2024-03-03".to_string(),
                duration: 45.0,
                distance: 1.5,
                photo: Some("activities/k3j9x0a/1-abc.jpg".to_string()),
                owner: Some("k3j9x0a".to_string()),
                created_at: "2024-03-03T08:00:00.000Z".to_string(),
            }],
        }
    }

    #[test]
    fn test_load_before_any_save_is_absent() {
        let dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::open(dir.path()).unwrap();

        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_then_load_returns_same_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::open(dir.path()).unwrap();
        let snapshot = sample_snapshot();

        store.write(&snapshot).unwrap();

        assert_eq!(store.load(), Some(snapshot));
        assert!(store.path().ends_with("activity-tracker-data.json"));
    }

    #[test]
    fn test_snapshot_survives_reopen() {
        let dir = TempDir::new().unwrap();
        FileSnapshotStore::open(dir.path())
            .unwrap()
            .write(&sample_snapshot())
            .unwrap();

        let reopened = FileSnapshotStore::open(dir.path()).unwrap();
        assert_eq!(reopened.load(), Some(sample_snapshot()));
    }

    #[test]
    fn test_corrupt_file_loads_as_absent() {
        let dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::open(dir.path()).unwrap();
        fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(store.read(), Err(PersistError::Corrupt(_))));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_open_creates_nested_data_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");

        let store = FileSnapshotStore::open(&nested).unwrap();
        store.write(&Snapshot::default()).unwrap();

        assert!(nested.join("activity-tracker-data.json").exists());
    }

    #[test]
    fn test_write_replaces_file_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::open(dir.path()).unwrap();

        store.write(&sample_snapshot()).unwrap();
        store.write(&Snapshot::default()).unwrap();

        assert_eq!(store.read().unwrap(), Some(Snapshot::default()));
        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("activity-tracker-data.json")]);
    }
}
