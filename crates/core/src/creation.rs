//! Session creation form
//!
//! Everything is checked before a [`Meeting`] exists, so a rejected form
//! never touches the store.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::assistant::{Assistant, SessionDraft};
use crate::error::ValidationError;
use crate::invariants::assert_new_session_invariants;
use crate::models::{Meeting, MeetingStatus, StartTime, User};

/// Capacity offered by a fresh form
pub const DEFAULT_MAX_SLOTS: u32 = 12;
/// Start time offered by a fresh form
pub const DEFAULT_START_TIME: &str = "10:00";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionForm {
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub start_time: String,
    pub max_slots: u32,
    /// Comma separated, as typed
    pub tags: String,
    /// Subject handed to the draft assistant
    pub topic: String,
}

impl SessionForm {
    /// Blank form dated `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            date: today.format("%Y-%m-%d").to_string(),
            start_time: DEFAULT_START_TIME.to_string(),
            max_slots: DEFAULT_MAX_SLOTS,
            tags: String::new(),
            topic: String::new(),
        }
    }

    /// Overwrite title, description and tags with an assistant draft
    pub fn apply_draft(&mut self, draft: &SessionDraft) {
        self.title = draft.title.clone();
        self.description = draft.description.clone();
        self.tags = draft.tags.join(", ");
    }

    /// Ask the assistant for a draft of `self.topic` and apply it.
    ///
    /// A blank topic or a failed call leaves the form as it was. Returns
    /// whether the form changed.
    pub async fn prefill(&mut self, assistant: &dyn Assistant) -> bool {
        let topic = self.topic.trim();
        if topic.is_empty() {
            return false;
        }
        match assistant.draft_session(topic).await {
            Ok(draft) => {
                debug!(title = %draft.title, "Applying session draft");
                self.apply_draft(&draft);
                true
            }
            Err(e) => {
                warn!(error = %e, "Session draft failed");
                false
            }
        }
    }

    /// Tags split on commas, trimmed, blanks dropped
    pub fn parsed_tags(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Validate against `now` and build the meeting `creator` will host
    pub fn validate(&self, now: NaiveDateTime, creator: &User) -> Result<Meeting, ValidationError> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(self.date.clone()))?;
        let time = NaiveTime::parse_from_str(self.start_time.trim(), "%H:%M")
            .map_err(|_| ValidationError::InvalidTime(self.start_time.clone()))?;

        if date.and_time(time) <= now {
            return Err(ValidationError::PastSchedule);
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.max_slots < 1 {
            return Err(ValidationError::InvalidCapacity);
        }

        let meeting = Meeting {
            id: Uuid::new_v4().to_string(),
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            host: creator.real_name.clone(),
            host_id: creator.id.clone(),
            date,
            start_time: StartTime::Clock(self.start_time.trim().to_string()),
            max_slots: self.max_slots,
            booked_slots: 1,
            tags: self.parsed_tags(),
            status: MeetingStatus::Upcoming,
        };
        assert_new_session_invariants(&meeting);
        Ok(meeting)
    }
}
