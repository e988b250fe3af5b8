//! Activity log entries shown in the admin inspector

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    Login,
    MeetingHosted,
    ProfileUpdate,
    Follow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub description: String,
    pub timestamp: String,
}

impl Activity {
    fn new(id: &str, kind: ActivityKind, description: &str, timestamp: &str) -> Self {
        Self {
            id: id.to_string(),
            kind,
            description: description.to_string(),
            timestamp: timestamp.to_string(),
        }
    }

    /// Fixed illustrative log. Not derived from real history.
    pub fn illustrative_log() -> Vec<Activity> {
        vec![
            Activity::new(
                "a1",
                ActivityKind::Login,
                "Session initialized via remote node",
                "2024-05-18 09:42:00",
            ),
            Activity::new(
                "a2",
                ActivityKind::MeetingHosted,
                "Hosted \"Advanced Buffer Overflow\"",
                "2024-05-17 14:00:00",
            ),
            Activity::new(
                "a3",
                ActivityKind::ProfileUpdate,
                "Bio encryption keys updated",
                "2024-05-16 11:20:00",
            ),
            Activity::new(
                "a4",
                ActivityKind::Follow,
                "Started following @CipherSmith",
                "2024-05-15 23:10:00",
            ),
        ]
    }
}
