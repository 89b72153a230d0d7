//! Complete application state, persisted and restored as a unit.

use serde::{Deserialize, Serialize};

use crate::models::{Activity, User};

/// The `{user, activities}` value held by the store.
///
/// Every field defaults when absent from stored JSON, so a snapshot written
/// by an older client merges onto the empty initial state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Session user (`None` when logged out)
    #[serde(default)]
    pub user: Option<User>,
    /// Activities, most recent first
    #[serde(default)]
    pub activities: Vec<Activity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_activities_defaults_to_empty() {
        let snapshot: Snapshot =
            serde_json::from_str(r#"{"user":{"id":"x1","email":"a@x.com"}}"#).unwrap();

        assert_eq!(snapshot.user.unwrap().email, "a@x.com");
        assert!(snapshot.activities.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let snapshot: Snapshot =
            serde_json::from_str(r#"{"activities":[],"theme":"dark"}"#).unwrap();

        assert_eq!(snapshot, Snapshot::default());
    }
}
