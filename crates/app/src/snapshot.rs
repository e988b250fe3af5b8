//! Plain-text dashboard snapshot

use std::fmt::Write as _;

use talks_core::dashboard::SLIDER_WINDOW;
use talks_core::lifecycle;
use talks_core::{DashboardQuery, Meeting, MeetingStatus, RoomRuntime, User};

/// Featured slider, one explorer page per tab and the viewer line
pub fn render_dashboard(meetings: &[Meeting], viewer: Option<&User>, query: &DashboardQuery) -> String {
    let mut out = String::new();

    match viewer {
        Some(user) => {
            let _ = writeln!(out, "Node: {} ({}) [{}]", user.username, user.real_name, user.role);
        }
        None => {
            let _ = writeln!(out, "Node: visitor");
        }
    }

    let _ = writeln!(out, "\nFeatured (top {SLIDER_WINDOW})");
    for m in query.featured(meetings) {
        let _ = writeln!(out, "  {}", meeting_line(m));
    }

    for status in MeetingStatus::all() {
        let mut tab = query.clone();
        tab.set_tab(*status);
        let page = tab.explorer_page(meetings);
        let _ = writeln!(
            out,
            "\n{} - showing {}-{} of {} (page {}/{})",
            status,
            page.showing_from,
            page.showing_to,
            page.total,
            if page.total_pages == 0 { 0 } else { page.page + 1 },
            page.total_pages
        );
        for m in page.items {
            let _ = writeln!(out, "  {}", meeting_line(m));
        }
    }

    out
}

/// Header, roster and chat log of a room
pub fn render_room(runtime: &RoomRuntime) -> String {
    let room = runtime.room();
    let mut out = String::new();

    let _ = writeln!(out, "Room: {} [{:?}]", room.meeting().title, room.tab());
    let _ = writeln!(
        out,
        "Mode: {}",
        if room.is_host() { "host" } else { "listening" }
    );
    for p in room.participants() {
        let _ = writeln!(out, "  * {} ({:?})", p.name, p.role);
    }
    for msg in room.messages() {
        let _ = writeln!(out, "[{}] {}: {}", msg.timestamp, msg.sender, msg.text);
    }

    out
}

fn meeting_line(m: &Meeting) -> String {
    format!(
        "{:<12} {} {:>9}  {:<44} {:>2}/{:<2} ({}%, {} free)  {}",
        m.id,
        m.date,
        m.start_time.as_str(),
        m.title,
        m.booked_slots,
        m.max_slots,
        lifecycle::capacity_percent(m),
        lifecycle::remaining_slots(m),
        m.host
    )
}
