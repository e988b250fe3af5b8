//! Meeting store - the single writer of meeting records
//!
//! Holds the full list in memory and rewrites the whole `meetings_db`
//! document after every mutation.

use chrono::NaiveDate;
use rand::Rng;
use tracing::{debug, info, instrument, warn};

use super::traits::{DocumentRepository, MEETINGS_KEY};
use crate::invariants::assert_meeting_invariants;
use crate::lifecycle;
use crate::models::{Meeting, MeetingStatus};
use crate::seed::seed_meetings;

/// Meetings hosted by one user, split by status
#[derive(Debug, Clone, Default)]
pub struct HostedMeetings {
    pub upcoming: Vec<Meeting>,
    pub live: Vec<Meeting>,
    pub past: Vec<Meeting>,
}

pub struct MeetingStore<R: DocumentRepository> {
    repo: R,
    meetings: Vec<Meeting>,
}

impl<R: DocumentRepository> MeetingStore<R> {
    /// Restore the persisted list, or seed and persist a fresh one.
    ///
    /// Never fails: a missing, unreadable or unreachable document falls back
    /// to seed data.
    #[instrument(skip(repo, rng))]
    pub fn initialize<G: Rng>(repo: R, today: NaiveDate, rng: &mut G) -> Self {
        let restored = match repo.load_json::<Vec<Meeting>>(MEETINGS_KEY) {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "Could not read meetings, using seed data");
                None
            }
        };

        match restored {
            Some(meetings) => {
                info!(count = meetings.len(), "Restored meetings");
                Self { repo, meetings }
            }
            None => {
                let store = Self {
                    repo,
                    meetings: seed_meetings(today, rng),
                };
                info!(count = store.meetings.len(), "Seeded meetings");
                store.persist();
                store
            }
        }
    }

    /// Full list in store order (most recently added first, then seed order)
    pub fn meetings(&self) -> &[Meeting] {
        &self.meetings
    }

    pub fn len(&self) -> usize {
        self.meetings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meetings.is_empty()
    }

    /// Single-record lookup by id
    pub fn find(&self, id: &str) -> Option<&Meeting> {
        self.meetings.iter().find(|m| m.id == id)
    }

    /// Prepend a new meeting and persist
    #[instrument(skip(self, meeting), fields(meeting_id = %meeting.id))]
    pub fn add(&mut self, meeting: Meeting) {
        assert_meeting_invariants(&meeting);
        self.meetings.insert(0, meeting);
        self.persist();
    }

    /// Take one slot if the meeting exists and is not full.
    ///
    /// Persists on every call, whether or not anything changed. Returns
    /// `true` when a slot was booked.
    #[instrument(skip(self))]
    pub fn book_slot(&mut self, id: &str) -> bool {
        let booked = match self.meetings.iter_mut().find(|m| m.id == id) {
            Some(m) if !lifecycle::is_full(m) => {
                m.booked_slots += 1;
                debug!(booked = m.booked_slots, max = m.max_slots, "Slot booked");
                true
            }
            Some(_) => {
                debug!("Meeting full, booking ignored");
                false
            }
            None => {
                debug!("Meeting not found, booking ignored");
                false
            }
        };
        self.persist();
        booked
    }

    /// Meetings whose `host_id` is the given user
    pub fn hosted_by(&self, host_id: &str) -> HostedMeetings {
        let mut hosted = HostedMeetings::default();
        for m in self.meetings.iter().filter(|m| m.is_hosted_by(host_id)) {
            match m.status {
                MeetingStatus::Upcoming => hosted.upcoming.push(m.clone()),
                MeetingStatus::Live => hosted.live.push(m.clone()),
                MeetingStatus::Past => hosted.past.push(m.clone()),
            }
        }
        hosted
    }

    /// Give the repository back (for tests and reloads)
    pub fn into_repository(self) -> R {
        self.repo
    }

    fn persist(&self) {
        if let Err(e) = self.repo.save_json(MEETINGS_KEY, &self.meetings) {
            warn!(error = %e, "Failed to persist meetings");
        }
    }
}
