//! Live session room: content stage, host devices, whiteboard and chat

mod runtime;
mod state;
pub mod whiteboard;

pub use runtime::{RoomEvent, RoomRuntime};
pub use state::{
    ContentTab, Participant, RequestId, SessionRoom, ShareToggle, Submission, AI_PREFIX,
    DEMO_MEMBERS, FALLBACK_ADVICE, GREETING,
};
pub use whiteboard::{Point, Stroke, Whiteboard};
