use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

use crate::api_error::{ApiError, ApiResult};
use crate::dates::{is_future_day, local_midnight, WeekWindow};
use crate::habits::helpers::{get_habit_from_db, get_habit_from_row};

use super::data::*;

pub fn day_from_secs(secs: i64, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or(rusqlite::Error::IntegralValueOutOfRange(column, secs))
}

pub fn get_log_from_row(row: &Row) -> rusqlite::Result<HabitLog> {
    Ok(HabitLog {
        id: row.get(0)?,
        habit_id: row.get(1)?,
        date: day_from_secs(row.get(2)?, 2)?,
        done: row.get(3)?,
        habit: None,
    })
}

/// Every record of the week, done or not, with its habit attached.
pub fn get_week_logs_from_db(
    window: &WeekWindow,
    db_connection: &Connection,
) -> ApiResult<Vec<HabitLog>> {
    let mut statement = db_connection.prepare(
        "SELECT l.id, l.habit_id, l.day, l.done, h.id, h.name, h.color, h.created_at
         FROM habit_logs l JOIN habits h ON h.id = l.habit_id
         WHERE l.day >= (?1) AND l.day < (?2)
         ORDER BY h.name ASC, l.day ASC",
    )?;

    let logs = statement
        .query_map(
            params![window.from.timestamp(), window.until.timestamp()],
            |row| {
                let mut log = get_log_from_row(row)?;
                log.habit = Some(get_habit_from_row(row, 4)?);
                Ok(log)
            },
        )?
        .collect::<rusqlite::Result<Vec<HabitLog>>>()?;

    Ok(logs)
}

/// Flips the completion of `day`, creating the record as done on first use.
///
/// The write is a single upsert inside an immediate transaction, so toggles of
/// the same day from any connection are serialized: they can never both create
/// a record or both read the same prior state.
pub fn toggle_log_in_db(
    habit_id: &str,
    day: NaiveDate,
    today: NaiveDate,
    tz: &Tz,
    db_connection: &Connection,
) -> ApiResult<HabitLog> {
    if is_future_day(day, today) {
        get_habit_from_db(habit_id, db_connection)?;
        return Err(ApiError::validation("Cannot toggle a future day"));
    }

    let transaction = Transaction::new_unchecked(db_connection, TransactionBehavior::Immediate)?;
    get_habit_from_db(habit_id, &transaction)?;

    let log = transaction.query_row(
        "INSERT INTO habit_logs (id, habit_id, day, done) VALUES (?1, ?2, ?3, 1)
         ON CONFLICT (habit_id, day) DO UPDATE SET done = NOT habit_logs.done
         RETURNING id, habit_id, day, done",
        params![
            Uuid::new_v4().to_string(),
            habit_id,
            local_midnight(day, tz).timestamp()
        ],
        get_log_from_row,
    )?;
    transaction.commit()?;

    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{open_connection, test_connection};
    use crate::dates::parse_day;
    use std::sync::Barrier;
    use std::thread;
    use crate::habits::helpers::{add_test_habit, delete_habit_from_db};

    const TZ: Tz = chrono_tz::Asia::Kolkata;

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    fn toggle(habit_id: &str, s: &str, connection: &Connection) -> ApiResult<HabitLog> {
        toggle_log_in_db(habit_id, day(s), day("2024-03-20"), &TZ, connection)
    }

    #[test]
    fn first_toggle_creates_completed_record() {
        let connection = test_connection();
        let habit = add_test_habit("Read", &connection);

        let log = toggle(&habit.id, "2024-03-11", &connection).unwrap();

        assert!(log.done);
        assert_eq!(log.habit_id, habit.id);
        assert_eq!(log.date, local_midnight(day("2024-03-11"), &TZ));
    }

    #[test]
    fn toggling_twice_restores_state() {
        let connection = test_connection();
        let habit = add_test_habit("Read", &connection);

        let first = toggle(&habit.id, "2024-03-11", &connection).unwrap();
        let second = toggle(&habit.id, "2024-03-11", &connection).unwrap();
        let third = toggle(&habit.id, "2024-03-11", &connection).unwrap();

        assert!(first.done);
        assert!(!second.done);
        assert!(third.done);
        assert_eq!(first.id, second.id);
        assert_eq!(second.id, third.id);
    }

    #[test]
    fn toggle_of_missing_habit_has_no_side_effect() {
        let connection = test_connection();

        let result = toggle("missing", "2024-03-11", &connection);

        assert!(matches!(result, Err(ApiError::NotFound(_))));
        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM habit_logs", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn future_day_cannot_be_toggled() {
        let connection = test_connection();
        let habit = add_test_habit("Read", &connection);

        let result = toggle_log_in_db(&habit.id, day("2024-03-21"), day("2024-03-20"), &TZ, &connection);
        assert!(matches!(result, Err(ApiError::Validation(_))));

        let today = toggle_log_in_db(&habit.id, day("2024-03-20"), day("2024-03-20"), &TZ, &connection);
        assert!(today.unwrap().done);
    }

    #[test]
    fn concurrent_toggles_of_one_day_are_serialized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("habits.db");
        let path = path.to_str().unwrap();
        let habit = add_test_habit("Read", &open_connection(path).unwrap());
        let barrier = Barrier::new(2);

        let results: Vec<HabitLog> = thread::scope(|scope| {
            let workers: Vec<_> = (0..2)
                .map(|_| {
                    scope.spawn(|| {
                        let connection = open_connection(path).unwrap();
                        barrier.wait();
                        toggle(&habit.id, "2024-03-11", &connection).unwrap()
                    })
                })
                .collect();
            workers.into_iter().map(|worker| worker.join().unwrap()).collect()
        });

        let mut done: Vec<bool> = results.iter().map(|log| log.done).collect();
        done.sort();
        assert_eq!(done, vec![false, true]);
        assert_eq!(results[0].id, results[1].id);

        let connection = open_connection(path).unwrap();
        let stored: Vec<bool> = connection
            .prepare("SELECT done FROM habit_logs")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<Vec<bool>>>()
            .unwrap();
        assert_eq!(stored, vec![false]);
    }

    #[test]
    fn week_listing_stays_inside_window() {
        let connection = test_connection();
        let walk = add_test_habit("Walk", &connection);
        let code = add_test_habit("Code", &connection);

        toggle(&walk.id, "2024-03-10", &connection).unwrap();
        toggle(&walk.id, "2024-03-11", &connection).unwrap();
        toggle(&walk.id, "2024-03-17", &connection).unwrap();
        toggle(&walk.id, "2024-03-18", &connection).unwrap();
        toggle(&code.id, "2024-03-12", &connection).unwrap();
        toggle(&code.id, "2024-03-12", &connection).unwrap();

        let window = WeekWindow::containing(day("2024-03-14"), &TZ);
        let logs = get_week_logs_from_db(&window, &connection).unwrap();

        let summary: Vec<(String, NaiveDate, bool)> = logs
            .iter()
            .map(|log| {
                (
                    log.habit.as_ref().unwrap().name.clone(),
                    crate::dates::local_day(log.date, &TZ),
                    log.done,
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Code".to_string(), day("2024-03-12"), false),
                ("Walk".to_string(), day("2024-03-11"), true),
                ("Walk".to_string(), day("2024-03-17"), true),
            ]
        );
    }

    #[test]
    fn deleting_habit_removes_its_logs() {
        let connection = test_connection();
        let habit = add_test_habit("Walk", &connection);
        toggle(&habit.id, "2024-03-11", &connection).unwrap();
        toggle(&habit.id, "2024-03-12", &connection).unwrap();

        delete_habit_from_db(&habit.id, &connection).unwrap();

        let window = WeekWindow::containing(day("2024-03-11"), &TZ);
        assert!(get_week_logs_from_db(&window, &connection).unwrap().is_empty());
        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM habit_logs", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
