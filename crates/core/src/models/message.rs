//! Room chat messages (never persisted)

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Author of a room message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    /// The local viewer
    You,
    System,
    /// The advice assistant ("Nexus AI")
    Assistant,
    Participant(String),
}

impl Sender {
    pub fn display_name(&self) -> &str {
        match self {
            Sender::You => "You",
            Sender::System => "System",
            Sender::Assistant => "Nexus AI",
            Sender::Participant(name) => name,
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A chat line in a session room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Position in the room log, starting at 1
    pub id: u64,
    pub sender: Sender,
    pub text: String,
    /// `HH:MM` display stamp
    pub timestamp: String,
}

impl Message {
    pub fn new(id: u64, sender: Sender, text: String) -> Self {
        Self {
            id,
            sender,
            text,
            timestamp: Local::now().format("%H:%M").to_string(),
        }
    }
}
