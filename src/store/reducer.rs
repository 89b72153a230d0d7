//! State transitions.
//!
//! `reduce` is pure: it never touches storage or the clock. Ids and
//! timestamps are minted by the caller before an action is dispatched.

use crate::models::{Activity, Snapshot, User};

/// A state change request.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace state with a hydrated snapshot.
    Init(Snapshot),
    SetUser(User),
    Logout,
    /// Prepend a fully-formed record.
    AddActivity(Activity),
    /// Replace the record with the same id, keeping its position.
    UpdateActivity(Activity),
    /// Remove the record with this id.
    DeleteActivity(String),
}

/// Apply `action` to `state`, producing the next snapshot.
pub fn reduce(state: &Snapshot, action: Action) -> Snapshot {
    match action {
        Action::Init(snapshot) => snapshot,
        Action::SetUser(user) => Snapshot {
            user: Some(user),
            ..state.clone()
        },
        Action::Logout => Snapshot {
            user: None,
            ..state.clone()
        },
        Action::AddActivity(activity) => {
            let mut activities = Vec::with_capacity(state.activities.len() + 1);
            activities.push(activity);
            activities.extend(state.activities.iter().cloned());
            Snapshot {
                user: state.user.clone(),
                activities,
            }
        }
        Action::UpdateActivity(activity) => Snapshot {
            user: state.user.clone(),
            activities: state
                .activities
                .iter()
                .map(|a| {
                    if a.id == activity.id {
                        activity.clone()
                    } else {
                        a.clone()
                    }
                })
                .collect(),
        },
        Action::DeleteActivity(id) => Snapshot {
            user: state.user.clone(),
            activities: state
                .activities
                .iter()
                .filter(|a| a.id != id)
                .cloned()
                .collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_activity(id: &str, activity_type: &str) -> Activity {
        Activity {
            id: id.to_string(),
            activity_type: activity_type.to_string(),
            date: "2024-01-01".to_string(),
            duration: 30.0,
            distance: 5.0,
            photo: None,
            owner: None,
            created_at: "2024-01-01T10:00:00.000Z".to_string(),
        }
    }

    fn state_with(ids: &[&str]) -> Snapshot {
        Snapshot {
            user: None,
            activities: ids.iter().map(|id| make_activity(id, "run")).collect(),
        }
    }

    fn ids(state: &Snapshot) -> Vec<&str> {
        state.activities.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_add_prepends() {
        let state = state_with(&["b", "a"]);
        let next = reduce(&state, Action::AddActivity(make_activity("c", "ride")));

        assert_eq!(ids(&next), vec!["c", "b", "a"]);
        // Input snapshot is untouched
        assert_eq!(ids(&state), vec!["b", "a"]);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let state = state_with(&["c", "b", "a"]);
        let mut updated = make_activity("b", "hike");
        updated.distance = 12.0;

        let next = reduce(&state, Action::UpdateActivity(updated.clone()));

        assert_eq!(ids(&next), vec!["c", "b", "a"]);
        assert_eq!(next.activities[1], updated);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let state = state_with(&["b", "a"]);
        let next = reduce(&state, Action::UpdateActivity(make_activity("zzz", "hike")));

        assert_eq!(next, state);
    }

    #[test]
    fn test_delete_removes_only_match() {
        let state = state_with(&["d", "c", "b", "a"]);
        let next = reduce(&state, Action::DeleteActivity("c".to_string()));

        assert_eq!(ids(&next), vec!["d", "b", "a"]);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let state = state_with(&["a"]);
        let next = reduce(&state, Action::DeleteActivity("nope".to_string()));

        assert_eq!(next, state);
    }

    #[test]
    fn test_logout_keeps_activities() {
        let mut state = state_with(&["a"]);
        state.user = Some(User {
            id: "u1".to_string(),
            email: "a@x.com".to_string(),
        });

        let next = reduce(&state, Action::Logout);

        assert!(next.user.is_none());
        assert_eq!(ids(&next), vec!["a"]);
        // Logging out twice is the same as once
        assert_eq!(reduce(&next, Action::Logout), next);
    }

    #[test]
    fn test_set_user_replaces_session() {
        let state = state_with(&["a"]);
        let user = User {
            id: "u2".to_string(),
            email: "b@x.com".to_string(),
        };

        let next = reduce(&state, Action::SetUser(user.clone()));

        assert_eq!(next.user, Some(user));
        assert_eq!(ids(&next), vec!["a"]);
    }

    #[test]
    fn test_init_replaces_state() {
        let state = state_with(&["a"]);
        let stored = state_with(&["x", "y"]);

        assert_eq!(reduce(&state, Action::Init(stored.clone())), stored);
    }
}
