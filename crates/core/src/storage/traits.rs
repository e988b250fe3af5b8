//! Storage repository traits
//!
//! The meeting store, the user directory and the session state only need a
//! key/value document store. This trait is that seam, so the same code runs
//! against SQLite, a shared handle, or a test double.

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::parse::decode_or_absent;
use crate::error::{Error, Result};

/// Key of the full meeting list
pub const MEETINGS_KEY: &str = "meetings_db";
/// Key of the full user list
pub const USERS_KEY: &str = "users_db";
/// Key of the signed-in user's record
pub const SESSION_KEY: &str = "current_session";

/// Whole-document key/value operations
pub trait DocumentRepository {
    /// Raw text under `key`, `None` when absent
    fn load_document(&self, key: &str) -> Result<Option<String>>;

    /// Replace the document under `key`
    fn save_document(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the document under `key`
    fn delete_document(&self, key: &str) -> Result<()>;

    /// Load and decode a JSON document. Unreadable content counts as absent.
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>
    where
        Self: Sized,
    {
        Ok(decode_or_absent(key, self.load_document(key)?))
    }

    /// Encode and store a JSON document
    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        let text = serde_json::to_string(value)?;
        self.save_document(key, &text)
    }
}

impl<T: DocumentRepository + ?Sized> DocumentRepository for &T {
    fn load_document(&self, key: &str) -> Result<Option<String>> {
        (**self).load_document(key)
    }

    fn save_document(&self, key: &str, value: &str) -> Result<()> {
        (**self).save_document(key, value)
    }

    fn delete_document(&self, key: &str) -> Result<()> {
        (**self).delete_document(key)
    }
}

// One connection shared by several stores
impl<T: DocumentRepository> DocumentRepository for Arc<Mutex<T>> {
    fn load_document(&self, key: &str) -> Result<Option<String>> {
        self.lock()
            .map_err(|_| Error::InvalidOperation("document store lock poisoned".into()))?
            .load_document(key)
    }

    fn save_document(&self, key: &str, value: &str) -> Result<()> {
        self.lock()
            .map_err(|_| Error::InvalidOperation("document store lock poisoned".into()))?
            .save_document(key, value)
    }

    fn delete_document(&self, key: &str) -> Result<()> {
        self.lock()
            .map_err(|_| Error::InvalidOperation("document store lock poisoned".into()))?
            .delete_document(key)
    }
}
