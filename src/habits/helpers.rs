use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::api_error::{ApiError, ApiResult};

use super::data::*;

pub const HABIT_COLUMNS: &str = "id, name, color, created_at";

pub fn timestamp_from_millis(millis: i64, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(column, millis))
}

/// Reads a habit from `HABIT_COLUMNS` starting at `offset`.
pub fn get_habit_from_row(row: &Row, offset: usize) -> rusqlite::Result<Habit> {
    Ok(Habit {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        color: row.get(offset + 2)?,
        created_at: timestamp_from_millis(row.get(offset + 3)?, offset + 3)?,
    })
}

fn clean_name(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

fn clean_color(color: Option<&str>) -> Option<String> {
    color.filter(|color| !color.is_empty()).map(str::to_string)
}

pub fn get_all_habits_from_db(db_connection: &Connection) -> ApiResult<Vec<Habit>> {
    let mut statement = db_connection.prepare(&format!(
        "SELECT {} FROM habits ORDER BY created_at DESC, rowid DESC",
        HABIT_COLUMNS
    ))?;

    let habits = statement
        .query_map([], |row| get_habit_from_row(row, 0))?
        .collect::<rusqlite::Result<Vec<Habit>>>()?;

    Ok(habits)
}

pub fn get_habit_from_db(habit_id: &str, db_connection: &Connection) -> ApiResult<Habit> {
    db_connection
        .query_row(
            &format!("SELECT {} FROM habits WHERE id = (?1)", HABIT_COLUMNS),
            params![habit_id],
            |row| get_habit_from_row(row, 0),
        )
        .optional()?
        .ok_or(ApiError::NotFound("Habit"))
}

pub fn add_habit_to_db(
    request: CreateHabitRequest,
    default_color: &str,
    db_connection: &Connection,
) -> ApiResult<Habit> {
    let name = clean_name(request.name.as_deref())
        .ok_or_else(|| ApiError::validation("Habit name is required"))?;

    let habit = Habit {
        id: Uuid::new_v4().to_string(),
        name,
        color: clean_color(request.color.as_deref()).unwrap_or_else(|| default_color.to_string()),
        // stored as milliseconds
        created_at: Utc::now().trunc_subsecs(3),
    };

    db_connection.execute(
        "INSERT INTO habits (id, name, color, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            habit.id,
            habit.name,
            habit.color,
            habit.created_at.timestamp_millis()
        ],
    )?;

    Ok(habit)
}

pub fn update_habit_in_db(
    habit_id: &str,
    request: UpdateHabitRequest,
    db_connection: &Connection,
) -> ApiResult<Habit> {
    let name = clean_name(request.name.as_deref());
    let color = clean_color(request.color.as_deref());

    if name.is_none() && color.is_none() {
        return Err(ApiError::validation("No valid fields to update"));
    }

    let changed = db_connection.execute(
        "UPDATE habits SET name = COALESCE(?1, name), color = COALESCE(?2, color) WHERE id = (?3)",
        params![name, color, habit_id],
    )?;

    if changed == 0 {
        return Err(ApiError::NotFound("Habit"));
    }

    get_habit_from_db(habit_id, db_connection)
}

/// Logs of the habit go with it through the foreign key cascade.
pub fn delete_habit_from_db(habit_id: &str, db_connection: &Connection) -> ApiResult<()> {
    let deleted = db_connection.execute("DELETE FROM habits WHERE id = (?1)", params![habit_id])?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Habit"));
    }

    Ok(())
}

#[cfg(test)]
pub fn add_test_habit(name: &str, db_connection: &Connection) -> Habit {
    add_habit_to_db(
        CreateHabitRequest {
            name: Some(name.to_string()),
            color: None,
        },
        "#22c55e",
        db_connection,
    )
    .unwrap()
}
