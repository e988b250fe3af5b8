//! Data models for Talks

mod activity;
mod meeting;
mod message;
mod user;

pub use activity::*;
pub use meeting::*;
pub use message::*;
pub use user::*;
