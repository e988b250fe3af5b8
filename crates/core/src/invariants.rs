//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use crate::models::{Meeting, MeetingStatus, User, UserRole};

/// Validate a meeting entering the store through creation.
///
/// Seeded and restored records are not checked: the seed may carry any
/// booked count.
pub fn assert_meeting_invariants(meeting: &Meeting) {
    debug_assert!(
        !meeting.id.trim().is_empty(),
        "Meeting has empty id"
    );

    debug_assert!(
        meeting.max_slots > 0,
        "Meeting {} has no capacity",
        meeting.id
    );

    debug_assert!(
        meeting.booked_slots <= meeting.max_slots,
        "Meeting {} is overbooked: {}/{}",
        meeting.id,
        meeting.booked_slots,
        meeting.max_slots
    );
}

/// Validate a freshly created session
pub fn assert_new_session_invariants(meeting: &Meeting) {
    assert_meeting_invariants(meeting);

    debug_assert!(
        meeting.status == MeetingStatus::Upcoming,
        "New meeting {} created with status {}",
        meeting.id,
        meeting.status
    );

    debug_assert!(
        meeting.booked_slots == 1,
        "New meeting {} should start with the host's slot booked",
        meeting.id
    );
}

/// Validate that a user list keeps usernames unique and at least one admin
pub fn assert_directory_invariants(users: &[User]) {
    for (i, a) in users.iter().enumerate() {
        debug_assert!(
            !users[i + 1..].iter().any(|b| b.username == a.username),
            "Duplicate username {}",
            a.username
        );
    }

    debug_assert!(
        users.is_empty() || users.iter().any(|u| u.role == UserRole::Admin),
        "Directory has users but no ADMIN"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StartTime;
    use chrono::NaiveDate;

    fn make_meeting(booked: u32) -> Meeting {
        Meeting {
            id: "m1".to_string(),
            title: "Test".to_string(),
            description: String::new(),
            host: "Host".to_string(),
            host_id: "u1".to_string(),
            date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            start_time: StartTime::from("10:00"),
            max_slots: 12,
            booked_slots: booked,
            tags: Vec::new(),
            status: MeetingStatus::Upcoming,
        }
    }

    #[test]
    fn test_valid_new_session() {
        assert_new_session_invariants(&make_meeting(1));
    }

    #[test]
    #[should_panic(expected = "overbooked")]
    fn test_overbooked_meeting() {
        assert_meeting_invariants(&make_meeting(13));
    }

    #[test]
    fn test_directory_with_admin() {
        let users = vec![
            User::new("admin".to_string(), "Root".to_string()).with_role(UserRole::Admin),
            User::new("node".to_string(), "Node".to_string()),
        ];
        assert_directory_invariants(&users);
    }

    #[test]
    #[should_panic(expected = "Duplicate username")]
    fn test_directory_duplicate_username() {
        let users = vec![
            User::new("admin".to_string(), "Root".to_string()).with_role(UserRole::Admin),
            User::new("admin".to_string(), "Other".to_string()),
        ];
        assert_directory_invariants(&users);
    }
}
