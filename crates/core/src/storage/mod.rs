//! SQLite-backed document storage for Talks

mod documents;
mod meetings;
mod migrations;
mod parse;
mod traits;

use rusqlite::Connection;
use std::path::Path;
use tracing::instrument;

use crate::error::Result;

pub use documents::DocumentStore;
pub use meetings::{HostedMeetings, MeetingStore};
pub use traits::{DocumentRepository, MEETINGS_KEY, SESSION_KEY, USERS_KEY};

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        migrations::get_current_version(&self.conn).unwrap_or(0)
    }

    /// Get document store
    pub fn documents(&self) -> DocumentStore<'_> {
        DocumentStore::new(&self.conn)
    }
}

impl DocumentRepository for Database {
    fn load_document(&self, key: &str) -> Result<Option<String>> {
        self.documents().get(key)
    }

    fn save_document(&self, key: &str, value: &str) -> Result<()> {
        self.documents().put(key, value)
    }

    fn delete_document(&self, key: &str) -> Result<()> {
        self.documents().delete(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_schema_version_after_open() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.schema_version() >= 1);
    }

    #[test]
    fn test_shared_handle_sees_same_documents() {
        let shared = Arc::new(Mutex::new(Database::open_in_memory().unwrap()));
        let other = shared.clone();

        shared.save_json(USERS_KEY, &vec!["a", "b"]).unwrap();
        let loaded: Option<Vec<String>> = other.load_json(USERS_KEY).unwrap();
        assert_eq!(loaded, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_on_disk_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talks.db");

        {
            let db = Database::open(&path).unwrap();
            db.save_document(SESSION_KEY, "{\"id\":\"u1\"}").unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(
            db.load_document(SESSION_KEY).unwrap().as_deref(),
            Some("{\"id\":\"u1\"}")
        );
    }
}
