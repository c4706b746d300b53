use rocket::serde::json::Json;
use rocket::{get, State};

use crate::api_error::ApiResult;
use crate::config::AppConfig;
use crate::dates::WeekWindow;

use super::data::*;
use super::helpers::*;
use crate::data::{DBConnection, WeekQuery};

#[get("/stats?<week_query..>")]
pub fn get_stats(
    week_query: WeekQuery,
    db_connection: &State<DBConnection>,
    config: &State<AppConfig>,
) -> ApiResult<Json<WeeklyStats>> {
    let window = WeekWindow::parse(week_query.required()?, &config.timezone)?;

    let db_connection = db_connection.lock()?;
    let stats = get_weekly_stats_from_db(
        &window,
        config.streak_lookback,
        &config.timezone,
        &db_connection,
    )?;

    Ok(Json(stats))
}
