use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use rusqlite::{params, Connection};

use std::collections::HashMap;

use crate::api_error::ApiResult;
use crate::dates::{local_day, local_midnight, WeekWindow, DAYS_PER_WEEK};
use crate::habits::data::{Habit, HabitID};
use crate::habits::helpers::{get_habit_from_row, HABIT_COLUMNS};
use crate::logs::helpers::day_from_secs;

use super::data::*;

/// `count / possible` as a whole percent, halves rounded up.
pub fn percent(count: u32, possible: u32) -> u32 {
    if possible == 0 {
        return 0;
    }

    let (count, possible) = (u64::from(count), u64::from(possible));
    ((count * 200 + possible) / (possible * 2)) as u32
}

/// Counts consecutive completed days ending at `anchor`.
///
/// `completed_days` must be in descending order. An incomplete anchor day does
/// not break the streak on its own; a gap of two or more days does.
pub fn count_streak(completed_days: impl IntoIterator<Item = NaiveDate>, anchor: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut cursor = anchor;

    for day in completed_days {
        match (cursor - day).num_days() {
            0 => {
                streak += 1;
                cursor = cursor - Duration::days(1);
            }
            1 => {
                streak += 1;
                cursor = day - Duration::days(1);
            }
            _ => break,
        }
    }

    streak
}

pub fn get_completed_days_from_db(
    habit_id: &str,
    up_to: NaiveDate,
    lookback: u32,
    tz: &Tz,
    db_connection: &Connection,
) -> ApiResult<Vec<NaiveDate>> {
    let mut statement = db_connection.prepare(
        "SELECT day FROM habit_logs
         WHERE habit_id = (?1) AND done = 1 AND day <= (?2)
         ORDER BY day DESC
         LIMIT (?3)",
    )?;

    let days = statement
        .query_map(
            params![habit_id, local_midnight(up_to, tz).timestamp(), lookback],
            |row| day_from_secs(row.get(0)?, 0).map(|instant| local_day(instant, tz)),
        )?
        .collect::<rusqlite::Result<Vec<NaiveDate>>>()?;

    Ok(days)
}

pub fn calculate_streak(
    habit_id: &str,
    anchor: NaiveDate,
    lookback: u32,
    tz: &Tz,
    db_connection: &Connection,
) -> ApiResult<u32> {
    let days = get_completed_days_from_db(habit_id, anchor, lookback, tz, db_connection)?;

    Ok(count_streak(days, anchor))
}

fn get_habits_by_name(db_connection: &Connection) -> ApiResult<Vec<Habit>> {
    let mut statement = db_connection.prepare(&format!(
        "SELECT {} FROM habits ORDER BY name ASC, created_at ASC, rowid ASC",
        HABIT_COLUMNS
    ))?;

    let habits = statement
        .query_map([], |row| get_habit_from_row(row, 0))?
        .collect::<rusqlite::Result<Vec<Habit>>>()?;

    Ok(habits)
}

fn get_completed_counts(
    window: &WeekWindow,
    db_connection: &Connection,
) -> ApiResult<HashMap<HabitID, u32>> {
    let mut statement = db_connection.prepare(
        "SELECT habit_id, COUNT(*) FROM habit_logs
         WHERE done = 1 AND day >= (?1) AND day < (?2)
         GROUP BY habit_id",
    )?;

    let counts = statement
        .query_map(
            params![window.from.timestamp(), window.until.timestamp()],
            |row| Ok((row.get::<usize, HabitID>(0)?, row.get::<usize, u32>(1)?)),
        )?
        .collect::<rusqlite::Result<HashMap<HabitID, u32>>>()?;

    Ok(counts)
}

pub fn get_weekly_stats_from_db(
    window: &WeekWindow,
    lookback: u32,
    tz: &Tz,
    db_connection: &Connection,
) -> ApiResult<WeeklyStats> {
    let habits = get_habits_by_name(db_connection)?;
    let counts = get_completed_counts(window, db_connection)?;
    let days_per_week = DAYS_PER_WEEK as u32;

    let mut per_habit = Vec::with_capacity(habits.len());
    for habit in habits {
        let count = counts.get(&habit.id).copied().unwrap_or(0);
        let streak = calculate_streak(&habit.id, window.last_day(), lookback, tz, db_connection)?;

        per_habit.push(HabitStats {
            percent: percent(count, days_per_week),
            habit_id: habit.id,
            habit_name: habit.name,
            count,
            streak,
        });
    }

    let possible = per_habit.len() as u32 * days_per_week;
    let count: u32 = counts.values().sum();

    Ok(WeeklyStats {
        week_start: window.start,
        per_habit,
        total: TotalStats {
            count,
            possible,
            percent: percent(count, possible),
        },
    })
}
