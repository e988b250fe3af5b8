//! Dashboard query engine
//!
//! Read-only views over the meeting list with three independent axes:
//! - the explorer: status tab + text filter + pagination
//! - the featured slider: a fixed window over all UPCOMING meetings
//! - the view mode (grid or table), purely presentational
//!
//! Out-of-range navigation is ignored rather than reported.

use crate::models::{Meeting, MeetingStatus};

/// Number of meetings visible in the featured slider
pub const SLIDER_WINDOW: usize = 4;
/// Rows per explorer page
pub const EXPLORER_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Grid,
    Table,
}

/// One page of explorer results
#[derive(Debug, Clone)]
pub struct ExplorerPage<'a> {
    pub items: Vec<&'a Meeting>,
    /// Zero-based page index
    pub page: usize,
    pub total_pages: usize,
    /// Size of the filtered set
    pub total: usize,
    /// 1-based position of the first row shown (0 when empty)
    pub showing_from: usize,
    /// 1-based position of the last row shown (0 when empty)
    pub showing_to: usize,
}

/// Navigation state of one dashboard view
#[derive(Debug, Clone)]
pub struct DashboardQuery {
    tab: MeetingStatus,
    filter: String,
    page: usize,
    slider_offset: usize,
    view_mode: ViewMode,
}

impl DashboardQuery {
    /// Signed-in viewers start in the table view, visitors in the grid
    pub fn new(signed_in: bool) -> Self {
        Self {
            tab: MeetingStatus::Upcoming,
            filter: String::new(),
            page: 0,
            slider_offset: 0,
            view_mode: if signed_in {
                ViewMode::Table
            } else {
                ViewMode::Grid
            },
        }
    }

    pub fn tab(&self) -> MeetingStatus {
        self.tab
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn slider_offset(&self) -> usize {
        self.slider_offset
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Switch status tab; returns to the first page
    pub fn set_tab(&mut self, tab: MeetingStatus) {
        self.tab = tab;
        self.page = 0;
    }

    /// Change the text filter; returns to the first page
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.page = 0;
    }

    // ---- explorer ----

    /// Meetings in the active tab whose title or a tag contains the filter
    pub fn explorer_matches<'a>(&self, meetings: &'a [Meeting]) -> Vec<&'a Meeting> {
        let needle = self.filter.to_lowercase();
        meetings
            .iter()
            .filter(|m| m.status == self.tab)
            .filter(|m| needle.is_empty() || m.matches_text(&needle))
            .collect()
    }

    pub fn total_pages(&self, meetings: &[Meeting]) -> usize {
        page_count(self.explorer_matches(meetings).len())
    }

    /// Current explorer page
    pub fn explorer_page<'a>(&self, meetings: &'a [Meeting]) -> ExplorerPage<'a> {
        let matches = self.explorer_matches(meetings);
        let total = matches.len();
        let start = (self.page * EXPLORER_PAGE_SIZE).min(total);
        let end = (start + EXPLORER_PAGE_SIZE).min(total);

        ExplorerPage {
            items: matches[start..end].to_vec(),
            page: self.page,
            total_pages: page_count(total),
            total,
            showing_from: if end > start { start + 1 } else { 0 },
            showing_to: end,
        }
    }

    /// Jump to `index`. Indices outside `[0, total_pages)` are ignored.
    pub fn set_page(&mut self, meetings: &[Meeting], index: isize) -> bool {
        let total_pages = self.total_pages(meetings);
        if index < 0 || index as usize >= total_pages {
            return false;
        }
        self.page = index as usize;
        true
    }

    /// Move by `delta` pages, ignored when the target is out of range
    pub fn change_page(&mut self, meetings: &[Meeting], delta: isize) -> bool {
        let Some(target) = isize::try_from(self.page)
            .ok()
            .and_then(|page| page.checked_add(delta))
        else {
            return false;
        };
        self.set_page(meetings, target)
    }

    pub fn next_page(&mut self, meetings: &[Meeting]) -> bool {
        self.change_page(meetings, 1)
    }

    pub fn prev_page(&mut self, meetings: &[Meeting]) -> bool {
        self.change_page(meetings, -1)
    }

    // ---- featured slider ----

    /// All UPCOMING meetings, regardless of tab and filter
    pub fn upcoming<'a>(meetings: &'a [Meeting]) -> Vec<&'a Meeting> {
        meetings
            .iter()
            .filter(|m| m.status == MeetingStatus::Upcoming)
            .collect()
    }

    /// Visible slider window
    pub fn featured<'a>(&self, meetings: &'a [Meeting]) -> Vec<&'a Meeting> {
        let upcoming = Self::upcoming(meetings);
        let start = self.slider_offset.min(max_slider_offset(upcoming.len()));
        upcoming
            .into_iter()
            .skip(start)
            .take(SLIDER_WINDOW)
            .collect()
    }

    /// Advance the slider by one, unless the window already shows the tail
    pub fn next_slide(&mut self, meetings: &[Meeting]) -> bool {
        let len = Self::upcoming(meetings).len();
        if self.slider_offset + SLIDER_WINDOW < len {
            self.slider_offset += 1;
            return true;
        }
        false
    }

    /// Move the slider back by one, unless already at the start
    pub fn prev_slide(&mut self) -> bool {
        if self.slider_offset > 0 {
            self.slider_offset -= 1;
            return true;
        }
        false
    }
}

impl Default for DashboardQuery {
    fn default() -> Self {
        Self::new(false)
    }
}

fn page_count(total: usize) -> usize {
    total.div_ceil(EXPLORER_PAGE_SIZE)
}

fn max_slider_offset(len: usize) -> usize {
    len.saturating_sub(SLIDER_WINDOW)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StartTime;
    use crate::seed::seed_meetings;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded() -> Vec<Meeting> {
        seed_meetings(
            NaiveDate::from_ymd_opt(2030, 3, 10).unwrap(),
            &mut StdRng::seed_from_u64(5),
        )
    }

    fn meeting(id: &str, title: &str, tags: &[&str], status: MeetingStatus) -> Meeting {
        Meeting {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            host: "GhostRoot".to_string(),
            host_id: "u1".to_string(),
            date: NaiveDate::from_ymd_opt(2030, 3, 11).unwrap(),
            start_time: StartTime::from("10:00"),
            max_slots: 10,
            booked_slots: 1,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            status,
        }
    }

    #[test]
    fn test_defaults() {
        let q = DashboardQuery::new(true);
        assert_eq!(q.tab(), MeetingStatus::Upcoming);
        assert_eq!(q.page(), 0);
        assert_eq!(q.view_mode(), ViewMode::Table);
        assert_eq!(DashboardQuery::new(false).view_mode(), ViewMode::Grid);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        let meetings = seeded();
        let mut q = DashboardQuery::default();
        assert_eq!(q.total_pages(&meetings), 6); // 55 upcoming

        q.set_tab(MeetingStatus::Live);
        assert_eq!(q.total_pages(&meetings), 1);

        q.set_tab(MeetingStatus::Past);
        assert_eq!(q.total_pages(&meetings), 6);

        q.set_filter("no such thing");
        assert_eq!(q.total_pages(&meetings), 0);
    }

    #[test]
    fn test_page_navigation_clamps() {
        let meetings = seeded();
        let mut q = DashboardQuery::default();

        assert!(!q.prev_page(&meetings));
        assert!(!q.set_page(&meetings, -1));
        assert_eq!(q.page(), 0);

        assert!(q.set_page(&meetings, 5));
        assert!(!q.next_page(&meetings));
        assert!(!q.set_page(&meetings, 6));
        assert_eq!(q.page(), 5);

        let last = q.explorer_page(&meetings);
        assert_eq!(last.items.len(), 5);
        assert_eq!(last.showing_from, 51);
        assert_eq!(last.showing_to, 55);
        assert_eq!(last.total, 55);
    }

    #[test]
    fn test_huge_page_jumps_are_ignored() {
        let meetings = seeded();
        let mut q = DashboardQuery::default();
        assert!(q.set_page(&meetings, 2));

        assert!(!q.change_page(&meetings, isize::MAX));
        assert!(!q.change_page(&meetings, isize::MIN));
        assert!(!q.set_page(&meetings, isize::MAX));
        assert_eq!(q.page(), 2);

        assert!(q.change_page(&meetings, -2));
        assert_eq!(q.page(), 0);
    }

    #[test]
    fn test_filter_and_tab_reset_page() {
        let meetings = seeded();
        let mut q = DashboardQuery::default();
        assert!(q.set_page(&meetings, 3));

        q.set_filter("cloud");
        assert_eq!(q.page(), 0);

        assert!(q.set_page(&meetings, 1));
        q.set_tab(MeetingStatus::Past);
        assert_eq!(q.page(), 0);
    }

    #[test]
    fn test_text_filter_stays_inside_tab() {
        let meetings = vec![
            meeting("a", "Docker escapes", &[], MeetingStatus::Upcoming),
            meeting("b", "Kernel fuzzing", &["DOCKER"], MeetingStatus::Upcoming),
            meeting("c", "Docker forensics", &[], MeetingStatus::Past),
            meeting("d", "Zero Trust", &["Cloud"], MeetingStatus::Upcoming),
            meeting("e", "Live docker triage", &[], MeetingStatus::Live),
        ];

        let mut q = DashboardQuery::default();
        q.set_filter("docker");

        let ids: Vec<&str> = q
            .explorer_matches(&meetings)
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_results_page() {
        let meetings = seeded();
        let mut q = DashboardQuery::default();
        q.set_filter("zzz");

        let page = q.explorer_page(&meetings);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!((page.showing_from, page.showing_to), (0, 0));
        assert!(!q.next_page(&meetings));
    }

    #[test]
    fn test_explorer_keeps_store_order() {
        let meetings = seeded();
        let q = DashboardQuery::default();
        let page = q.explorer_page(&meetings);
        let ids: Vec<&str> = page.items.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids[0], "upcoming-0");
        assert_eq!(ids[9], "upcoming-9");
    }

    #[test]
    fn test_slider_bounds() {
        let meetings = seeded();
        let mut q = DashboardQuery::default();

        assert!(!q.prev_slide());
        assert_eq!(q.slider_offset(), 0);

        let mut moves = 0;
        while q.next_slide(&meetings) {
            moves += 1;
        }
        assert_eq!(moves, 55 - SLIDER_WINDOW);
        assert_eq!(q.slider_offset(), 51);

        let window = q.featured(&meetings);
        assert_eq!(window.len(), SLIDER_WINDOW);
        assert_eq!(window[3].id, "upcoming-54");
    }

    #[test]
    fn test_slider_ignores_tab_and_filter() {
        let meetings = seeded();
        let mut q = DashboardQuery::default();
        q.set_tab(MeetingStatus::Past);
        q.set_filter("nothing matches this");

        let window = q.featured(&meetings);
        assert_eq!(window.len(), SLIDER_WINDOW);
        assert!(window.iter().all(|m| m.status == MeetingStatus::Upcoming));
    }

    #[test]
    fn test_slider_with_short_list() {
        let meetings = vec![
            meeting("a", "One", &[], MeetingStatus::Upcoming),
            meeting("b", "Two", &[], MeetingStatus::Upcoming),
        ];
        let mut q = DashboardQuery::default();
        assert!(!q.next_slide(&meetings));
        assert_eq!(q.featured(&meetings).len(), 2);
    }
}
