//! Talks Core Library
//!
//! Meeting store, dashboard queries, session rooms, accounts and the user
//! directory for the Z3r0Day Talks platform.

pub mod accounts;
pub mod assistant;
pub mod config;
pub mod creation;
pub mod dashboard;
pub mod directory;
pub mod error;
pub mod invariants;
pub mod lifecycle;
pub mod media;
pub mod models;
pub mod permissions;
pub mod room;
pub mod seed;
pub mod storage;

pub use accounts::{Accounts, RegistrationForm};
pub use assistant::{Assistant, GeminiAssistant, OfflineAssistant, SessionDraft};
pub use config::AppConfig;
pub use creation::SessionForm;
pub use dashboard::{DashboardQuery, ExplorerPage, ViewMode};
pub use directory::{Directory, NewUser, ProfileSection, UserUpdate};
pub use error::{Error, Result, ValidationError};
pub use media::{CaptureHandle, CaptureKind, MediaBackend, NoMedia, ScreenCapture};
pub use models::*;
pub use permissions::*;
pub use room::{ContentTab, RoomEvent, RoomRuntime, SessionRoom, Submission};
pub use storage::{Database, DocumentRepository, HostedMeetings, MeetingStore};
