use rocket::FromForm;
use rusqlite::{Connection, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api_error::{ApiError, ApiResult};

pub type DBConnection = Arc<Mutex<Connection>>;

#[derive(FromForm, Debug)]
pub struct WeekQuery {
    #[field(name = "weekStart")]
    pub week_start: Option<String>,
}

impl WeekQuery {
    pub fn required(&self) -> ApiResult<&str> {
        self.week_start
            .as_deref()
            .ok_or_else(|| ApiError::validation("weekStart parameter is required (YYYY-MM-DD)"))
    }
}

/// Body field that is `None` unless it holds a JSON string, so a wrong type
/// reaches the handler's validation instead of failing the whole body.
pub fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

pub fn open_connection(path: &str) -> Result<Connection> {
    let connection = if path == ":memory:" {
        Connection::open_in_memory()?
    } else {
        Connection::open(path)?
    };
    connection.busy_timeout(Duration::from_secs(5))?;

    initialize_schema(&connection)?;

    Ok(connection)
}

pub fn initialize_schema(connection: &Connection) -> Result<()> {
    connection.execute_batch(
        "
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS habit_logs (
            id TEXT PRIMARY KEY,
            habit_id TEXT NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
            day INTEGER NOT NULL,
            done INTEGER NOT NULL,
            UNIQUE (habit_id, day)
        );

        CREATE INDEX IF NOT EXISTS idx_habit_logs_day ON habit_logs(day);
        ",
    )
}

#[cfg(test)]
pub fn test_connection() -> Connection {
    open_connection(":memory:").unwrap()
}
