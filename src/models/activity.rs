// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity record model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Stored activity record.
///
/// Field names serialize in camelCase so the persisted blob keeps the shape
/// the browser client reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Activity {
    /// Random base-36 id, unique within the collection
    pub id: String,
    /// Activity kind (run, ride, swim, ...)
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Calendar date of the activity
    pub date: String,
    /// Duration in minutes
    pub duration: f64,
    /// Distance covered
    pub distance: f64,
    /// Object storage key or URL of the attached photo
    pub photo: Option<String>,
    /// Id of the user who logged the activity
    pub owner: Option<String>,
    /// Creation timestamp (ISO 8601), set once when the record is added
    pub created_at: String,
}

/// Fields supplied when logging a new activity.
///
/// The store assigns `id` and `createdAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NewActivity {
    #[serde(rename = "type")]
    pub activity_type: String,
    pub date: String,
    pub duration: f64,
    pub distance: f64,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
}

impl NewActivity {
    /// Build the stored record from the caller's fields.
    pub fn into_activity(self, id: String, created_at: String) -> Activity {
        Activity {
            id,
            activity_type: self.activity_type,
            date: self.date,
            duration: self.duration,
            distance: self.distance,
            photo: self.photo,
            owner: self.owner,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_json_uses_client_field_names() {
        let activity = Activity {
            id: "abc1234".to_string(),
            activity_type: "run".to_string(),
            date: "2024-01-01".to_string(),
            duration: 30.0,
            distance: 5.0,
            photo: None,
            owner: Some("u1".to_string()),
            created_at: "2024-01-01T10:00:00.000Z".to_string(),
        };

        let json = serde_json::to_value(&activity).unwrap();

        assert_eq!(json["type"], "run");
        assert_eq!(json["createdAt"], "2024-01-01T10:00:00.000Z");
        assert!(json["photo"].is_null());
        assert!(json.get("activity_type").is_none());
    }

    #[test]
    fn test_new_activity_photo_and_owner_default_to_none() {
        let json = r#"{"type":"ride","date":"2024-02-02","duration":90,"distance":42.5}"#;
        let new: NewActivity = serde_json::from_str(json).unwrap();

        assert_eq!(new.activity_type, "ride");
        assert_eq!(new.duration, 90.0);
        assert_eq!(new.photo, None);
        assert_eq!(new.owner, None);
    }
}
