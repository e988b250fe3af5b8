//! Stored value parsing utilities

use rusqlite::Error as SqlError;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Decode a stored JSON document, treating corrupt content as absent.
///
/// Callers fall back to seed data when this returns `None`.
pub fn decode_or_absent<T: DeserializeOwned>(key: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "Stored document is unreadable, ignoring it");
            None
        }
    }
}

/// Extension trait for converting rusqlite Results to Option
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, SqlError>;
}

impl<T> OptionalExt<T> for Result<T, SqlError> {
    fn optional(self) -> Result<Option<T>, SqlError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_absent_and_corrupt() {
        let missing: Option<Vec<u32>> = decode_or_absent("k", None);
        assert!(missing.is_none());

        let corrupt: Option<Vec<u32>> = decode_or_absent("k", Some("{not json".to_string()));
        assert!(corrupt.is_none());

        let ok: Option<Vec<u32>> = decode_or_absent("k", Some("[1,2]".to_string()));
        assert_eq!(ok, Some(vec![1, 2]));
    }
}
