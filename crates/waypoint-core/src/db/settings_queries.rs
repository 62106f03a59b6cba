//! Key/value settings holding JSON documents.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{DatabaseResultExt, Result};

const SELECT_SETTING_SQL: &str = "SELECT value FROM settings WHERE key = ?1";
const UPSERT_SETTING_SQL: &str = "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3) ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

impl super::Database {
    /// Reads and deserializes a setting. `None` when the key was never set.
    pub fn get_setting<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw: Option<String> = self
            .connection
            .query_row(SELECT_SETTING_SQL, params![key], |row| row.get(0))
            .optional()
            .db_context("Failed to query setting")?;

        raw.map(|json| serde_json::from_str(&json).map_err(Into::into))
            .transpose()
    }

    /// Serializes and stores a setting, replacing any previous value.
    pub fn set_setting<T: Serialize>(&mut self, key: &str, value: &T, now: Timestamp) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.connection
            .execute(UPSERT_SETTING_SQL, params![key, json, now.to_string()])
            .db_context("Failed to store setting")?;
        Ok(())
    }
}
