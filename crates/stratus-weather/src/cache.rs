//! Single-key persistent store for the last successful weather payload.
//!
//! Backed by a key-value table so the app survives restarts; the payload is
//! replaced wholesale on every successful fetch (last writer wins) and never
//! expires on its own.

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CacheError;
use crate::types::WeatherRecord;

/// Key the serialized payload lives under by default.
pub const DEFAULT_KEY: &str = "weatherResponseData";

/// Bumped whenever [`WeatherRecord`]'s serialized shape changes; older
/// payloads are discarded on load instead of failing the decode.
const SCHEMA_VERSION: u32 = 1;

/// Versioned envelope around the persisted record.
#[derive(Debug, Serialize, Deserialize)]
struct CachedPayload {
    version: u32,
    record: WeatherRecord,
}

/// Persistent single-key cache for the most recent [`WeatherRecord`].
pub struct WeatherCache {
    conn: Connection,
    key: String,
}

impl WeatherCache {
    /// Open (or create) the cache database at the given path.
    pub fn new<P: AsRef<Path>>(path: P, key: impl Into<String>) -> Result<Self, CacheError> {
        let conn = Connection::open(path)?;
        let cache = Self {
            conn,
            key: key.into(),
        };
        cache.init_schema()?;
        Ok(cache)
    }

    /// Create an in-memory cache (for testing).
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, CacheError> {
        let conn = Connection::open_in_memory()?;
        let cache = Self {
            conn,
            key: DEFAULT_KEY.to_string(),
        };
        cache.init_schema()?;
        Ok(cache)
    }

    /// Initialize the key-value schema.
    fn init_schema(&self) -> Result<(), CacheError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Replace the stored payload with this record.
    ///
    /// A whole-value replace, not a merge; callers treat failures as
    /// log-and-continue since a stale cache is preferable to no cache.
    pub fn save(&self, record: &WeatherRecord) -> Result<(), CacheError> {
        let payload = CachedPayload {
            version: SCHEMA_VERSION,
            record: record.clone(),
        };
        let json = serde_json::to_string(&payload)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;

        self.conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value) VALUES (?1, ?2)",
            params![self.key, json],
        )?;
        Ok(())
    }

    /// Load the last stored record.
    ///
    /// Absent, empty, corrupt, or out-of-date payloads all read as `None`;
    /// "nothing to show yet" is not an error.
    pub fn load(&self) -> Result<Option<WeatherRecord>, CacheError> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![self.key],
                |row| row.get(0),
            )
            .optional()?;

        let Some(json) = value else {
            return Ok(None);
        };
        if json.is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<CachedPayload>(&json) {
            Ok(payload) if payload.version == SCHEMA_VERSION => Ok(Some(payload.record)),
            Ok(payload) => {
                tracing::warn!(
                    "Discarding cached weather with schema version {}",
                    payload.version
                );
                Ok(None)
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable weather cache: {}", e);
                Ok(None)
            }
        }
    }
}
