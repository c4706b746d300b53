use std::error::Error;
use std::sync::{Arc, Mutex};

mod api_error;
mod config;
mod data;
mod dates;
mod habits;
mod logs;
mod stats;
mod weeks;


use api_error::ErrorBody;
use config::AppConfig;
use log::info;

#[macro_use]
extern crate rocket;

use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{Build, Request, Rocket};

#[catch(400)]
fn bad_request() -> Json<ErrorBody> {
    ErrorBody::new("Bad request")
}

#[catch(404)]
fn not_found(request: &Request) -> Json<ErrorBody> {
    ErrorBody::new(format!("No route for {} {}", request.method(), request.uri()))
}

/// Bodies that parse as JSON but not as the expected shape are client errors.
#[catch(422)]
fn unprocessable() -> status::Custom<Json<ErrorBody>> {
    status::Custom(Status::BadRequest, ErrorBody::new("Malformed request body"))
}

#[catch(500)]
fn internal_error() -> Json<ErrorBody> {
    ErrorBody::new("Internal server error")
}

pub fn build_rocket(figment: Figment) -> Result<Rocket<Build>, Box<dyn Error>> {
    let config: AppConfig = figment.extract()?;

    let connection = data::open_connection(&config.database)?;
    let connection = Arc::new(Mutex::new(connection));

    Ok(rocket::custom(figment)
        .manage(connection)
        .manage(config)
        .mount(
            "/api",
            routes![
                habits::endpoints::list_habits,
                habits::endpoints::get_habit,
                habits::endpoints::create_habit,
                habits::endpoints::update_habit,
                habits::endpoints::delete_habit,
                logs::endpoints::list_logs,
                logs::endpoints::toggle_log,
                stats::endpoints::get_stats,
                weeks::endpoints::get_week,
            ],
        )
        .register("/", catchers![bad_request, not_found, unprocessable, internal_error])
        .attach(AdHoc::on_liftoff("Habit store", |rocket| {
            Box::pin(async move {
                if let Some(config) = rocket.state::<AppConfig>() {
                    info!("using database {} in {}", config.database, config.timezone);
                }
            })
        })))
}

#[rocket::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let rocket = build_rocket(rocket::Config::figment())?;
    rocket.launch().await?;

    Ok(())
}
