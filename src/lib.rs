#[macro_use]
extern crate rocket;
#[macro_use]
extern crate diesel;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod db;
pub mod errors;
pub mod favorite;
pub mod recipe;
pub mod types;
pub mod users;
mod utils;

use crate::config::AppConfig;
use rocket::http::Status;
use rocket::request::Request;
use rocket::serde::json::{json, Value};
use rocket::{Build, Rocket};

#[catch(400)]
fn bad_request(_req: &Request) -> Value {
    json!({ "error": "Malformed request." })
}

#[catch(401)]
fn unauthorized(_req: &Request) -> Value {
    json!({ "error": "Unauthorized. Please log in." })
}

#[catch(404)]
fn not_found(_req: &Request) -> Value {
    json!({ "error": "Page not found." })
}

#[catch(422)]
fn unprocessable(_req: &Request) -> Value {
    json!({ "error": "The request could not be processed." })
}

#[catch(503)]
fn unavailable(_req: &Request) -> Value {
    json!({ "error": "Service unavailable." })
}

#[catch(default)]
fn fallback(status: Status, _req: &Request) -> Value {
    json!({ "error": status.reason().unwrap_or("Internal server error.") })
}

/// Builds the application: connection pool, schema, routes and catchers.
pub fn rocket(config: AppConfig) -> errors::Result<Rocket<Build>> {
    let pool = db::init_pool(&config)?;
    db::init_schema(&pool)?;
    tracing::info!(database_url = %config.database_url, pool_size = config.pool_size, "database ready");

    let mut figment = rocket::Config::figment();
    if let Some(secret_key) = &config.secret_key {
        figment = figment.merge(("secret_key", secret_key.as_str()));
    }

    Ok(rocket::custom(figment)
        .manage(pool)
        .manage(config)
        .mount(
            "/api",
            routes![
                users::signup,
                users::login,
                users::logout,
                users::list,
                users::access,
            ],
        )
        .mount(
            "/api",
            routes![
                recipe::list,
                recipe::create,
                recipe::update,
                recipe::remove,
                recipe::submitted,
            ],
        )
        .mount(
            "/api",
            routes![favorite::favorite, favorite::unfavorite, favorite::favorited],
        )
        .register(
            "/",
            catchers![bad_request, unauthorized, not_found, unprocessable, unavailable, fallback],
        ))
}
