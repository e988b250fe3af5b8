//! Session room state machine
//!
//! Synchronous and side-effect free: media and assistant calls are made by
//! [`super::RoomRuntime`], which feeds their outcomes back in here.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::whiteboard::Whiteboard;
use crate::error::Error;
use crate::models::{Meeting, Message, Sender, User};
use crate::permissions::{PermissionMatrix, RoomAction, RoomRole};

/// Chat prefix that routes the rest of a message to the assistant
pub const AI_PREFIX: &str = "/ai ";
pub const GREETING: &str = "Secure session established. End-to-end encryption active.";
pub const FALLBACK_ADVICE: &str = "I am sorry, I could not process that request.";
/// Members shown alongside the host
pub const DEMO_MEMBERS: [&str; 3] = ["NullPointer", "RootAccess", "CyberSentinel"];

/// What fills the main stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentTab {
    #[default]
    Whiteboard,
    Camera,
    ScreenShare,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub role: RoomRole,
    pub online: bool,
}

/// Correlation id of one advice request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

/// Outcome of submitting chat text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Blank input, nothing appended
    Ignored,
    /// Appended as a plain message
    Posted,
    /// Appended, and `query` must go to the assistant
    Advice { request_id: RequestId, query: String },
}

/// What a screen-share toggle should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareToggle {
    /// Not the host; nothing happens
    Denied,
    /// Request a capture, then call [`SessionRoom::begin_screen_share`]
    Start,
    /// Already sharing; the room is back on the whiteboard
    Stopped,
}

pub struct SessionRoom {
    meeting: Meeting,
    viewer: User,
    role: RoomRole,
    tab: ContentTab,
    camera_on: bool,
    mic_on: bool,
    messages: Vec<Message>,
    next_message_id: u64,
    pending: BTreeSet<RequestId>,
    next_request_id: u64,
    whiteboard: Whiteboard,
    participants: Vec<Participant>,
    open: bool,
}

impl SessionRoom {
    /// Enter `meeting` as `viewer`
    pub fn open(meeting: Meeting, viewer: User) -> Self {
        let role = RoomRole::resolve(&viewer, &meeting);

        let mut participants = vec![Participant {
            name: meeting.host.clone(),
            role: RoomRole::Host,
            online: true,
        }];
        participants.extend(DEMO_MEMBERS.iter().map(|name| Participant {
            name: name.to_string(),
            role: RoomRole::Participant,
            online: true,
        }));

        let mut room = Self {
            meeting,
            viewer,
            role,
            tab: ContentTab::Whiteboard,
            camera_on: false,
            mic_on: false,
            messages: Vec::new(),
            next_message_id: 1,
            pending: BTreeSet::new(),
            next_request_id: 1,
            whiteboard: Whiteboard::default(),
            participants,
            open: true,
        };
        room.push(Sender::System, GREETING.to_string());
        room
    }

    pub fn meeting(&self) -> &Meeting {
        &self.meeting
    }

    pub fn viewer(&self) -> &User {
        &self.viewer
    }

    pub fn role(&self) -> RoomRole {
        self.role
    }

    pub fn is_host(&self) -> bool {
        self.role == RoomRole::Host
    }

    pub fn tab(&self) -> ContentTab {
        self.tab
    }

    pub fn camera_on(&self) -> bool {
        self.camera_on
    }

    pub fn mic_on(&self) -> bool {
        self.mic_on
    }

    /// Non-hosts only ever listen
    pub fn is_listening_only(&self) -> bool {
        !self.is_host()
    }

    /// Full log in arrival order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// An advice request is outstanding
    pub fn is_thinking(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn whiteboard(&self) -> &Whiteboard {
        &self.whiteboard
    }

    /// Drawing surface for the host; `None` means read-only
    pub fn whiteboard_mut(&mut self) -> Option<&mut Whiteboard> {
        if self.can(RoomAction::Draw) {
            Some(&mut self.whiteboard)
        } else {
            None
        }
    }

    /// Wipe the board (host only)
    pub fn clear_whiteboard(&mut self) -> bool {
        if !self.can(RoomAction::ClearBoard) {
            return false;
        }
        self.whiteboard.clear();
        true
    }

    // ---- content selector ----

    /// Switch to the whiteboard or camera view. Screen share has its own
    /// toggle and is ignored here.
    pub fn select_tab(&mut self, tab: ContentTab) -> bool {
        let action = match tab {
            ContentTab::Whiteboard => RoomAction::SelectWhiteboard,
            ContentTab::Camera => RoomAction::SelectCamera,
            ContentTab::ScreenShare => return false,
        };
        if !self.can(action) {
            return false;
        }
        self.tab = tab;
        true
    }

    /// First half of a screen-share toggle
    pub fn toggle_screen_share(&mut self) -> ShareToggle {
        if !self.can(RoomAction::ToggleScreenShare) {
            debug!("Screen share toggle ignored for non-host");
            return ShareToggle::Denied;
        }
        if self.tab == ContentTab::ScreenShare {
            self.tab = ContentTab::Whiteboard;
            return ShareToggle::Stopped;
        }
        ShareToggle::Start
    }

    /// The capture was granted
    pub fn begin_screen_share(&mut self) -> bool {
        if !self.open || !self.can(RoomAction::ToggleScreenShare) {
            return false;
        }
        self.tab = ContentTab::ScreenShare;
        true
    }

    /// The capture ended from outside; back to the whiteboard
    pub fn end_screen_share(&mut self) -> bool {
        if self.tab != ContentTab::ScreenShare {
            return false;
        }
        self.tab = ContentTab::Whiteboard;
        true
    }

    // ---- host devices ----

    /// Flip the camera flag, returning the new value (`None` for non-hosts)
    pub fn toggle_camera(&mut self) -> Option<bool> {
        if !self.can(RoomAction::ToggleCamera) {
            return None;
        }
        self.camera_on = !self.camera_on;
        Some(self.camera_on)
    }

    /// Force the camera flag, e.g. back off after a denied capture
    pub fn set_camera(&mut self, on: bool) {
        if self.can(RoomAction::ToggleCamera) {
            self.camera_on = on;
        }
    }

    pub fn toggle_mic(&mut self) -> Option<bool> {
        if !self.can(RoomAction::ToggleMicrophone) {
            return None;
        }
        self.mic_on = !self.mic_on;
        Some(self.mic_on)
    }

    // ---- chat ----

    /// Append the viewer's text and report whether it asks the assistant
    pub fn submit(&mut self, text: &str) -> Submission {
        if !self.open || text.trim().is_empty() || !self.can(RoomAction::SendMessages) {
            return Submission::Ignored;
        }
        self.push(Sender::You, text.to_string());

        match advice_query(text) {
            Some(query) => {
                let request_id = RequestId(self.next_request_id);
                self.next_request_id += 1;
                self.pending.insert(request_id);
                debug!(request = request_id.0, "Advice requested");
                Submission::Advice {
                    request_id,
                    query: query.to_string(),
                }
            }
            None => Submission::Posted,
        }
    }

    /// Settle an advice request.
    ///
    /// Unknown, already settled or post-leave ids are discarded and return
    /// `false`. A failure only clears the request.
    pub fn resolve_advice(&mut self, request_id: RequestId, result: Result<String, Error>) -> bool {
        if !self.pending.remove(&request_id) {
            debug!(request = request_id.0, "Discarding stale advice");
            return false;
        }
        match result {
            Ok(text) if text.trim().is_empty() => {
                self.push(Sender::Assistant, FALLBACK_ADVICE.to_string());
            }
            Ok(text) => self.push(Sender::Assistant, text),
            Err(e) => warn!(request = request_id.0, error = %e, "Advice request failed"),
        }
        true
    }

    /// Leave the room; late results are ignored from now on
    pub fn leave(&mut self) {
        self.open = false;
        self.pending.clear();
        self.tab = ContentTab::Whiteboard;
        self.camera_on = false;
        self.mic_on = false;
    }

    fn can(&self, action: RoomAction) -> bool {
        PermissionMatrix::can_perform(self.role, action)
    }

    fn push(&mut self, sender: Sender, text: String) {
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.messages.push(Message::new(id, sender, text));
    }
}

/// The text after a case-insensitive `/ai ` prefix
fn advice_query(text: &str) -> Option<&str> {
    let head = text.get(..AI_PREFIX.len())?;
    if head.eq_ignore_ascii_case(AI_PREFIX) {
        text.get(AI_PREFIX.len()..)
    } else {
        None
    }
}
