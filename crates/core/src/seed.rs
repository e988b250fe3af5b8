//! Seed data used when no document has been persisted yet

use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::accounts::hash_password;
use crate::config::AdminConfig;
use crate::error::Result;
use crate::models::{
    Certification, Education, Experience, Gender, Meeting, MeetingStatus, Post,
    PrivacySettings, ResearchNote, StartTime, User, UserRole,
};

pub const LIVE_COUNT: usize = 10;
pub const UPCOMING_COUNT: usize = 55;
pub const PAST_COUNT: usize = 60;
pub const SEED_SLOTS: u32 = 15;

const HOSTS: [&str; 5] = ["GhostRoot", "CipherSmith", "KernelPanic", "ShadowByte", "ZeroSum"];

const TOPICS: [&str; 10] = [
    "Buffer Overflow",
    "Cloud Security",
    "Kubernetes Hacking",
    "Zero Trust",
    "Web3 Vulnerabilities",
    "Hardware Hacking",
    "Ransomware Triage",
    "Malware Analysis",
    "Forensics",
    "IoT Exploits",
];

const TAGS: [&str; 8] = [
    "Binary",
    "Exploit Dev",
    "Cloud",
    "Network",
    "Mobile",
    "Crypto",
    "Red Team",
    "Blue Team",
];

fn host(i: usize) -> (String, String) {
    (HOSTS[i % HOSTS.len()].to_string(), format!("u{}", (i % 5) + 1))
}

fn topic(i: usize) -> &'static str {
    TOPICS[i % TOPICS.len()]
}

fn tag(i: usize) -> String {
    TAGS[i % TAGS.len()].to_string()
}

/// Generate the 10 LIVE + 55 UPCOMING + 60 PAST seed meetings.
///
/// Everything but the UPCOMING fill level is deterministic; pass a seeded
/// RNG for fully reproducible output.
pub fn seed_meetings<R: Rng>(today: NaiveDate, rng: &mut R) -> Vec<Meeting> {
    let mut meetings = Vec::with_capacity(LIVE_COUNT + UPCOMING_COUNT + PAST_COUNT);

    for i in 0..LIVE_COUNT {
        let (host, host_id) = host(i);
        meetings.push(Meeting {
            id: format!("live-{i}"),
            title: format!("LIVE: {} Advanced session", topic(i)),
            description: "Analyzing live traffic and identifying anomalous patterns in real-time. Join the war room.".to_string(),
            host,
            host_id,
            date: today,
            start_time: StartTime::Now,
            max_slots: SEED_SLOTS,
            booked_slots: 12,
            tags: vec![tag(i), "LIVE".to_string()],
            status: MeetingStatus::Live,
        });
    }

    for i in 0..UPCOMING_COUNT {
        let (host, host_id) = host(i);
        meetings.push(Meeting {
            id: format!("upcoming-{i}"),
            title: format!("{} - Deep Dive v{i}", topic(i)),
            description: format!(
                "Comprehensive research into the latest CVEs affecting {} environments. Practical demos included.",
                topic(i)
            ),
            host,
            host_id,
            date: today + Duration::days(i as i64 + 1),
            start_time: StartTime::Clock(format!("{}:00", 10 + (i % 8))),
            max_slots: SEED_SLOTS,
            booked_slots: rng.gen_range(0..10),
            tags: vec![tag(i), tag(i + 1)],
            status: MeetingStatus::Upcoming,
        });
    }

    for i in 0..PAST_COUNT {
        let (host, host_id) = host(i);
        meetings.push(Meeting {
            id: format!("past-{i}"),
            title: format!("ARCHIVE: {} Case Study", topic(i)),
            description: format!(
                "A look back at how we mitigated the major breaches of last year related to {}.",
                topic(i)
            ),
            host,
            host_id,
            date: today - Duration::days(i as i64 + 1),
            start_time: StartTime::Completed,
            max_slots: SEED_SLOTS,
            booked_slots: SEED_SLOTS,
            tags: vec![tag(i), "ARCHIVE".to_string()],
            status: MeetingStatus::Past,
        });
    }

    meetings
}

/// The administrator plus one fully populated demo researcher
pub fn seed_users(admin: &AdminConfig) -> Result<Vec<User>> {
    let mut root = User::new(admin.username.clone(), "System Administrator".to_string())
        .with_role(UserRole::Admin)
        .with_email("admin@z3r0day.io".to_string());
    root.id = "admin-001".to_string();
    root.phone_number = "+1 000-0000".to_string();
    root.affiliation = "Core Command".to_string();
    root.expertise = vec!["System Management".to_string(), "Access Control".to_string()];
    root.bio = "Root level access. System-wide management node.".to_string();
    root.avatar = Some("https://api.dicebear.com/7.x/avataaars/svg?seed=Admin".to_string());
    root.reputation = 9999;
    root.avg_rating = 5.0;
    root.privacy_settings = PrivacySettings::all_visible();
    root.password_hash = Some(hash_password(&admin.password)?);

    let mut ghost = User::new("GhostRoot".to_string(), "Alex Rivers".to_string())
        .with_role(UserRole::Premium)
        .with_email("ghost@z3r0day.io".to_string());
    ghost.id = "u1".to_string();
    ghost.phone_number = "+1 555-0101".to_string();
    ghost.affiliation = "ZeroDay Labs".to_string();
    ghost.gender = Gender::Male;
    ghost.expertise = vec!["Web Security".to_string(), "Binary Analysis".to_string()];
    ghost.bio = "Core developer and security enthusiast. Specialized in kernel-level exploitation and sandbox escapes.".to_string();
    ghost.avatar = Some("https://api.dicebear.com/7.x/avataaars/svg?seed=Ghost".to_string());
    ghost.reputation = 1250;
    ghost.meeting_count = 24;
    ghost.total_meeting_duration = 1440;
    ghost.avg_rating = 4.9;
    ghost.followers_count = 156;
    ghost.following_count = 42;
    ghost.experiences = vec![Experience {
        id: "exp1".to_string(),
        company: "Palo Alto Networks".to_string(),
        position: "Security Researcher".to_string(),
        duration: "2020 - Present".to_string(),
        description: "Working on zero-day research.".to_string(),
    }];
    ghost.education = vec![Education {
        id: "edu1".to_string(),
        school: "MIT".to_string(),
        degree: "Computer Science".to_string(),
        year: "2019".to_string(),
    }];
    ghost.certifications = vec![Certification {
        id: "cert1".to_string(),
        name: "OSCP".to_string(),
        issuer: "OffSec".to_string(),
        year: "2021".to_string(),
    }];
    ghost.posts = vec![Post {
        id: "p1".to_string(),
        title: "Why I love C".to_string(),
        content: "Low level is the best level.".to_string(),
        date: "2024-05-10".to_string(),
    }];
    ghost.research_notes = vec![ResearchNote {
        id: "rn1".to_string(),
        title: "Buffer Overflows in 2024".to_string(),
        filename: "research_overflow.pdf".to_string(),
        date: "2024-05-12".to_string(),
        file_url: None,
    }];

    Ok(vec![root, ghost])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 3, 10).unwrap()
    }

    #[test]
    fn test_seed_counts() {
        let meetings = seed_meetings(today(), &mut StdRng::seed_from_u64(7));
        assert_eq!(meetings.len(), 125);

        let count = |s| meetings.iter().filter(|m| m.status == s).count();
        assert_eq!(count(MeetingStatus::Live), 10);
        assert_eq!(count(MeetingStatus::Upcoming), 55);
        assert_eq!(count(MeetingStatus::Past), 60);
    }

    #[test]
    fn test_seed_shapes() {
        let meetings = seed_meetings(today(), &mut StdRng::seed_from_u64(7));

        let live = &meetings[0];
        assert_eq!(live.id, "live-0");
        assert_eq!(live.date, today());
        assert_eq!(live.start_time, StartTime::Now);
        assert_eq!(live.booked_slots, 12);

        let up = meetings.iter().find(|m| m.id == "upcoming-9").unwrap();
        assert_eq!(up.date, today() + Duration::days(10));
        assert_eq!(up.start_time, StartTime::from("11:00"));
        assert_eq!(up.host, "ShadowByte");
        assert_eq!(up.host_id, "u5");
        assert!(up.booked_slots < 10);
        assert_eq!(up.tags, vec!["Exploit Dev".to_string(), "Cloud".to_string()]);

        let past = meetings.iter().find(|m| m.id == "past-0").unwrap();
        assert_eq!(past.date, today() - Duration::days(1));
        assert_eq!(past.start_time, StartTime::Completed);
        assert_eq!(past.booked_slots, past.max_slots);
    }

    #[test]
    fn test_seed_is_reproducible_with_same_rng_seed() {
        let a = seed_meetings(today(), &mut StdRng::seed_from_u64(42));
        let b = seed_meetings(today(), &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_seed_users() {
        let users = seed_users(&AdminConfig::default()).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, "admin-001");
        assert!(users[0].is_admin());
        assert!(users[0].password_hash.is_some());
        assert_eq!(users[1].username, "GhostRoot");
        assert!(users[1].password_hash.is_none());
    }
}
