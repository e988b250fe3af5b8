//! Permission system for room and platform operations

use crate::models::{Meeting, User, UserRole};

/// A viewer's role inside one session room
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RoomRole {
    Participant,
    Host,
}

impl RoomRole {
    /// Host identity is the meeting's `host_id`, never the display name
    pub fn resolve(viewer: &User, meeting: &Meeting) -> Self {
        if meeting.is_hosted_by(&viewer.id) {
            RoomRole::Host
        } else {
            RoomRole::Participant
        }
    }
}

/// Actions that can be performed in a session room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomAction {
    // Content selector
    SelectWhiteboard,
    SelectCamera,
    ToggleScreenShare,

    // Host devices
    ToggleCamera,
    ToggleMicrophone,

    // Whiteboard
    Draw,
    ClearBoard,

    // Chat
    SendMessages,
}

/// Platform-wide actions gated by account state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformAction {
    BookSlot,
    CreateSession,
    EditOwnProfile,
    AdminPanel,
    ManageUsers,
}

/// Permission matrix for room roles and platform roles
pub struct PermissionMatrix;

impl PermissionMatrix {
    /// Check if a room role has permission to perform an action
    pub fn can_perform(role: RoomRole, action: RoomAction) -> bool {
        match action {
            // Anyone may switch between board and camera view
            RoomAction::SelectWhiteboard => true,
            RoomAction::SelectCamera => true,
            RoomAction::SendMessages => true,

            // Host controls
            RoomAction::ToggleScreenShare => role == RoomRole::Host,
            RoomAction::ToggleCamera => role == RoomRole::Host,
            RoomAction::ToggleMicrophone => role == RoomRole::Host,
            RoomAction::Draw => role == RoomRole::Host,
            RoomAction::ClearBoard => role == RoomRole::Host,
        }
    }

    /// Check a platform action for the signed-in user (or a visitor when `None`)
    pub fn can_access(user: Option<&User>, action: PlatformAction) -> bool {
        let Some(user) = user else {
            return false;
        };
        match action {
            PlatformAction::BookSlot => true,
            PlatformAction::CreateSession => true,
            PlatformAction::EditOwnProfile => true,
            PlatformAction::AdminPanel => user.role == UserRole::Admin,
            PlatformAction::ManageUsers => user.role == UserRole::Admin,
        }
    }

    /// Check if `actor` may move `target` from its current role to `new_role`.
    ///
    /// Only admins change roles, an ADMIN keeps its role, and nobody changes
    /// their own.
    pub fn can_change_role(actor: &User, target: &User, new_role: UserRole) -> bool {
        if target.role == new_role {
            return true;
        }
        if actor.id == target.id {
            return false;
        }
        if target.role == UserRole::Admin {
            return false;
        }
        actor.role == UserRole::Admin
    }
}
