use log::info;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{delete, get, patch, post, State};

use crate::api_error::ApiResult;
use crate::config::AppConfig;

use super::data::*;
use super::helpers::*;
use crate::data::DBConnection;

#[get("/habits")]
pub fn list_habits(db_connection: &State<DBConnection>) -> ApiResult<Json<Vec<Habit>>> {
    let db_connection = db_connection.lock()?;

    let habits = get_all_habits_from_db(&db_connection)?;

    Ok(Json(habits))
}

#[get("/habits/<habit_id>")]
pub fn get_habit(habit_id: &str, db_connection: &State<DBConnection>) -> ApiResult<Json<Habit>> {
    let db_connection = db_connection.lock()?;
    get_habit_from_db(habit_id, &db_connection).map(Json)
}

#[post("/habits", data = "<create_habit_request>")]
pub fn create_habit(
    create_habit_request: Json<CreateHabitRequest>,
    db_connection: &State<DBConnection>,
    config: &State<AppConfig>,
) -> ApiResult<status::Created<Json<Habit>>> {
    let db_connection = db_connection.lock()?;

    let habit = add_habit_to_db(
        create_habit_request.into_inner(),
        &config.default_color,
        &db_connection,
    )?;
    info!("created habit {} ({})", habit.id, habit.name);

    Ok(status::Created::new(format!("/api/habits/{}", habit.id)).body(Json(habit)))
}

#[patch("/habits/<habit_id>", data = "<update_habit_request>")]
pub fn update_habit(
    habit_id: &str,
    update_habit_request: Json<UpdateHabitRequest>,
    db_connection: &State<DBConnection>,
) -> ApiResult<Json<Habit>> {
    let db_connection = db_connection.lock()?;

    update_habit_in_db(habit_id, update_habit_request.into_inner(), &db_connection).map(Json)
}

#[delete("/habits/<habit_id>")]
pub fn delete_habit(
    habit_id: &str,
    db_connection: &State<DBConnection>,
) -> ApiResult<status::NoContent> {
    let db_connection = db_connection.lock()?;

    delete_habit_from_db(habit_id, &db_connection)?;
    info!("deleted habit {}", habit_id);

    Ok(status::NoContent)
}
