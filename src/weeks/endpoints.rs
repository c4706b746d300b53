use rocket::serde::json::Json;
use rocket::{get, State};

use crate::api_error::ApiResult;
use crate::config::AppConfig;
use crate::dates::{self, WeekWindow};

use super::data::*;

/// The week containing `date`, or the current week.
#[get("/weeks?<date>")]
pub fn get_week(date: Option<&str>, config: &State<AppConfig>) -> ApiResult<Json<WeekView>> {
    let today = dates::today(&config.timezone);

    let window = match date {
        Some(date) => WeekWindow::parse(date, &config.timezone)?,
        None => WeekWindow::containing(today, &config.timezone),
    };

    Ok(Json(WeekView::new(&window, today)))
}
