//! Meeting lifecycle rules
//!
//! Pure functions over a [`Meeting`] value. Status is input data; nothing here
//! moves a meeting from UPCOMING to LIVE to PAST on its own.

use chrono::NaiveDate;

use crate::models::{Meeting, MeetingStatus, StartTime};

/// Every slot is taken
pub fn is_full(m: &Meeting) -> bool {
    m.booked_slots >= m.max_slots
}

/// Booked share of capacity in whole percent. A zero-slot meeting reads 0.
pub fn capacity_percent(m: &Meeting) -> u32 {
    if m.max_slots == 0 {
        return 0;
    }
    let percent = (100 * u64::from(m.booked_slots)) / u64::from(m.max_slots);
    u32::try_from(percent).unwrap_or(u32::MAX)
}

/// Slots still free (never negative, even for overfilled seed data)
pub fn remaining_slots(m: &Meeting) -> u32 {
    m.max_slots.saturating_sub(m.booked_slots)
}

/// Only upcoming meetings with a free slot accept bookings
pub fn can_book(m: &Meeting) -> bool {
    m.status == MeetingStatus::Upcoming && !is_full(m)
}

/// What the status would be if it were computed from the calendar.
///
/// Not applied by the store: a meeting's status stays whatever it was created
/// with. Kept for callers that want to flag stale records.
pub fn derive_status(date: NaiveDate, start_time: &StartTime, today: NaiveDate) -> MeetingStatus {
    match start_time {
        StartTime::Now => MeetingStatus::Live,
        StartTime::Completed => MeetingStatus::Past,
        StartTime::Clock(_) if date < today => MeetingStatus::Past,
        StartTime::Clock(_) => MeetingStatus::Upcoming,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meeting(booked: u32, max: u32, status: MeetingStatus) -> Meeting {
        Meeting {
            id: "m".to_string(),
            title: "t".to_string(),
            description: String::new(),
            host: "h".to_string(),
            host_id: "u1".to_string(),
            date: NaiveDate::from_ymd_opt(2030, 5, 1).unwrap(),
            start_time: StartTime::from("10:00"),
            max_slots: max,
            booked_slots: booked,
            tags: Vec::new(),
            status,
        }
    }

    #[test]
    fn test_is_full() {
        assert!(!is_full(&meeting(14, 15, MeetingStatus::Upcoming)));
        assert!(is_full(&meeting(15, 15, MeetingStatus::Upcoming)));
        assert!(is_full(&meeting(16, 15, MeetingStatus::Upcoming)));
    }

    #[test]
    fn test_capacity_percent() {
        assert_eq!(capacity_percent(&meeting(12, 15, MeetingStatus::Live)), 80);
        assert_eq!(capacity_percent(&meeting(1, 3, MeetingStatus::Upcoming)), 33);
        assert_eq!(capacity_percent(&meeting(0, 0, MeetingStatus::Upcoming)), 0);
        assert_eq!(capacity_percent(&meeting(5, 0, MeetingStatus::Upcoming)), 0);
    }

    #[test]
    fn test_capacity_percent_of_overfilled_record() {
        // Restored documents are not range checked
        assert_eq!(capacity_percent(&meeting(30, 15, MeetingStatus::Upcoming)), 200);
        assert_eq!(capacity_percent(&meeting(u32::MAX, 1, MeetingStatus::Upcoming)), u32::MAX);
    }

    #[test]
    fn test_can_book_needs_upcoming_and_room() {
        assert!(can_book(&meeting(3, 15, MeetingStatus::Upcoming)));
        assert!(!can_book(&meeting(15, 15, MeetingStatus::Upcoming)));
        assert!(!can_book(&meeting(3, 15, MeetingStatus::Live)));
        assert!(!can_book(&meeting(3, 15, MeetingStatus::Past)));
    }

    #[test]
    fn test_remaining_slots_saturates() {
        assert_eq!(remaining_slots(&meeting(3, 15, MeetingStatus::Upcoming)), 12);
        assert_eq!(remaining_slots(&meeting(20, 15, MeetingStatus::Upcoming)), 0);
    }

    #[test]
    fn test_derive_status() {
        let today = NaiveDate::from_ymd_opt(2030, 5, 1).unwrap();
        let yesterday = today.pred_opt().unwrap();
        assert_eq!(
            derive_status(today, &StartTime::Now, today),
            MeetingStatus::Live
        );
        assert_eq!(
            derive_status(yesterday, &StartTime::from("10:00"), today),
            MeetingStatus::Past
        );
        assert_eq!(
            derive_status(today, &StartTime::from("10:00"), today),
            MeetingStatus::Upcoming
        );
        assert_eq!(
            derive_status(today, &StartTime::Completed, today),
            MeetingStatus::Past
        );
    }
}
