//! Meeting model - a scheduled or live research session

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a meeting.
///
/// Set when the meeting is created or seeded and never recomputed from the
/// calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MeetingStatus {
    Upcoming,
    Live,
    Past,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Upcoming => "UPCOMING",
            MeetingStatus::Live => "LIVE",
            MeetingStatus::Past => "PAST",
        }
    }

    /// All statuses in dashboard tab order
    pub fn all() -> &'static [MeetingStatus] {
        &[
            MeetingStatus::Upcoming,
            MeetingStatus::Live,
            MeetingStatus::Past,
        ]
    }
}

impl Default for MeetingStatus {
    fn default() -> Self {
        MeetingStatus::Upcoming
    }
}

impl std::fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Start time of a meeting: a free-form clock string or one of two sentinels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StartTime {
    /// Happening right now (`"NOW"`)
    Now,
    /// Already over (`"COMPLETED"`)
    Completed,
    /// Wall clock text such as `"14:00"`
    Clock(String),
}

impl StartTime {
    pub fn as_str(&self) -> &str {
        match self {
            StartTime::Now => "NOW",
            StartTime::Completed => "COMPLETED",
            StartTime::Clock(s) => s,
        }
    }
}

impl From<String> for StartTime {
    fn from(value: String) -> Self {
        match value.as_str() {
            "NOW" => StartTime::Now,
            "COMPLETED" => StartTime::Completed,
            _ => StartTime::Clock(value),
        }
    }
}

impl From<&str> for StartTime {
    fn from(value: &str) -> Self {
        StartTime::from(value.to_string())
    }
}

impl From<StartTime> for String {
    fn from(value: StartTime) -> Self {
        match value {
            StartTime::Clock(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for StartTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A research session with capacity and tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Display name of the host. A cached copy; `host_id` is authoritative.
    pub host: String,
    pub host_id: String,
    pub date: NaiveDate,
    pub start_time: StartTime,
    pub max_slots: u32,
    pub booked_slots: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: MeetingStatus,
}

impl Meeting {
    /// Does the title or any tag contain `needle` (already lowercased)?
    pub fn matches_text(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }

    pub fn is_hosted_by(&self, user_id: &str) -> bool {
        self.host_id == user_id
    }
}
