//! Key/value JSON documents
//!
//! Every logical collection is stored as one whole JSON document. A write
//! replaces the full value.

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::instrument;

use super::parse::OptionalExt;
use crate::error::Result;

pub struct DocumentStore<'a> {
    conn: &'a Connection,
}

impl<'a> DocumentStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Raw JSON text stored under `key`
    #[instrument(skip(self))]
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM documents WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Insert or replace the document under `key`
    #[instrument(skip(self, value), fields(bytes = value.len()))]
    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO documents (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Remove the document; absent keys are fine
    pub fn delete(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM documents WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::Database;

    #[test]
    fn test_put_get_replace() {
        let db = Database::open_in_memory().unwrap();
        let docs = db.documents();

        assert!(docs.get("meetings_db").unwrap().is_none());

        docs.put("meetings_db", "[]").unwrap();
        assert_eq!(docs.get("meetings_db").unwrap().as_deref(), Some("[]"));

        docs.put("meetings_db", "[1]").unwrap();
        assert_eq!(docs.get("meetings_db").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_delete_missing_is_ok() {
        let db = Database::open_in_memory().unwrap();
        let docs = db.documents();
        docs.delete("current_session").unwrap();

        docs.put("current_session", "{}").unwrap();
        docs.delete("current_session").unwrap();
        assert!(docs.get("current_session").unwrap().is_none());
    }
}
