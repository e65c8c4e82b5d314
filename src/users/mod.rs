use crate::config::AppConfig;
use crate::db::DbConnection;
use crate::types::{ApiError, ApiResult, Validate, ValidationError};
use chrono::Utc;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use rocket::http::{CookieJar, Status};
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest, Request};
use rocket::response::status;
use rocket::serde::json::{json, Json, Value};
use rocket::State;
use serde::Deserialize;

pub mod gate;
pub mod models;
pub mod session;
mod utils;

pub use self::gate::{Always, Authorized, OnWrite};
pub use self::models::User;

pub type CurrentUser = Result<models::User, ApiError>;

use self::utils::*;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Validate for Credentials {
    type Error = ApiError;
    fn validate(self, connection: &mut SqliteConnection) -> Result<Self, Self::Error> {
        let mut errors = ValidationError::default();

        if let Err(e) = validate_username(&self.username) {
            errors.merge(e);
        }
        if let Err(e) = validate_password(&self.password) {
            errors.merge(e);
        }
        if User::username_exists(&self.username, connection)? {
            errors.add_error("username", "username already exists");
        }

        Ok(errors.into_result(self)?)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for models::User {
    type Error = ApiError;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let user_id = match session::user_id(request.cookies()) {
            Some(user_id) => user_id,
            None => return Outcome::Error((Status::Unauthorized, ApiError::Unauthorized)),
        };

        let mut connection = match request.guard::<DbConnection>().await {
            Outcome::Success(connection) => connection,
            _ => return Outcome::Error((Status::ServiceUnavailable, ApiError::Internal)),
        };

        match User::load_by_id(user_id, &mut connection) {
            Ok(Some(user)) => Outcome::Success(user),
            // The session outlived its user.
            Ok(None) => Outcome::Error((Status::Unauthorized, ApiError::Unauthorized)),
            Err(e) => Outcome::Error((e.status(), e)),
        }
    }
}

#[post("/signup", data = "<credentials>")]
pub fn signup(
    mut connection: DbConnection,
    config: &State<AppConfig>,
    cookies: &CookieJar<'_>,
    credentials: Json<Credentials>,
) -> Result<status::Created<Json<Value>>, ApiError> {
    let credentials = credentials.validate(&mut connection)?.into_inner();
    let new_user = models::NewUser {
        username: &credentials.username,
        password_hash: User::make_password(&credentials.password, config.bcrypt_cost)?,
        is_admin: false,
        created_at: Utc::now().naive_utc(),
    };

    let user = match new_user.insert(&mut connection) {
        Ok(user) => user,
        // Lost a race with another signup for the same name.
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            return Err(ValidationError::from("username", "username already exists").into())
        }
        Err(e) => return Err(e.into()),
    };

    session::establish(cookies, &user);
    tracing::info!(user_id = user.id, username = %user.username, "user signed up");
    Ok(status::Created::new("/api/users").body(Json(json!(user.summary()))))
}

#[post("/login", data = "<credentials>")]
pub fn login(
    mut connection: DbConnection,
    cookies: &CookieJar<'_>,
    credentials: Json<Credentials>,
) -> ApiResult<Value> {
    let user = match User::load_by_name(&credentials.username, &mut connection)? {
        Some(user) => user,
        None => {
            tracing::warn!(username = %credentials.username, "login for unknown user");
            return Err(ApiError::BadCredentials);
        }
    };

    if !user.verify_password(&credentials.password)? {
        tracing::warn!(user_id = user.id, "login with wrong password");
        return Err(ApiError::BadCredentials);
    }

    session::establish(cookies, &user);
    tracing::info!(user_id = user.id, "user logged in");
    Ok(Json(json!(user.summary())))
}

#[delete("/logout")]
pub fn logout(cookies: &CookieJar<'_>) -> Status {
    if let Some(user_id) = session::user_id(cookies) {
        tracing::info!(user_id, "user logged out");
    }
    session::clear(cookies);
    Status::NoContent
}

#[get("/users")]
pub fn list(mut connection: DbConnection) -> ApiResult<Vec<User>> {
    Ok(Json(User::load_all(&mut connection)?))
}

#[get("/")]
pub fn access(gate: Authorized) -> ApiResult<Value> {
    let user = gate.into_user()?;
    Ok(Json(json!({ "user_id": user.id, "msg": "Access granted." })))
}
