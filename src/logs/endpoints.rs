use log::{info, warn};
use rocket::serde::json::Json;
use rocket::{get, put, State};

use crate::api_error::{ApiError, ApiResult};
use crate::config::AppConfig;
use crate::dates::{self, WeekWindow};

use super::data::*;
use super::helpers::*;
use crate::data::{DBConnection, WeekQuery};

#[get("/logs?<week_query..>")]
pub fn list_logs(
    week_query: WeekQuery,
    db_connection: &State<DBConnection>,
    config: &State<AppConfig>,
) -> ApiResult<Json<Vec<HabitLog>>> {
    let window = WeekWindow::parse(week_query.required()?, &config.timezone)?;

    let db_connection = db_connection.lock()?;
    get_week_logs_from_db(&window, &db_connection).map(Json)
}

#[put("/logs/toggle", data = "<toggle_log_request>")]
pub fn toggle_log(
    toggle_log_request: Json<ToggleLogRequest>,
    db_connection: &State<DBConnection>,
    config: &State<AppConfig>,
) -> ApiResult<Json<HabitLog>> {
    let ToggleLogRequest { habit_id, date } = toggle_log_request.into_inner();

    let (habit_id, date) = match (habit_id, date) {
        (Some(habit_id), Some(date)) => (habit_id, date),
        _ => return Err(ApiError::validation("habitId and date are required")),
    };

    let day = dates::parse_day(&date).map_err(|e| {
        warn!("rejected toggle of {} for {:?}", habit_id, date);
        e
    })?;

    let db_connection = db_connection.lock()?;
    let log = toggle_log_in_db(
        &habit_id,
        day,
        dates::today(&config.timezone),
        &config.timezone,
        &db_connection,
    )?;
    info!("habit {} on {} is now done={}", habit_id, day, log.done);

    Ok(Json(log))
}
