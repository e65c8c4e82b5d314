use crate::utils::try_respond;
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::{json, Json};
use serde::Serialize;
use std::collections::BTreeMap;

pub trait Validate
where
    Self: Sized,
{
    type Error;
    fn validate(self, connection: &mut SqliteConnection) -> Result<Self, Self::Error>;
}

#[derive(Debug)]
pub enum ApiError {
    Diesel(DieselError),
    Validation(ValidationError),
    NotFound(String),
    BadCredentials,
    Unauthorized,
    Internal,
}

impl ApiError {
    pub fn recipe_not_found(recipe_id: i32) -> ApiError {
        ApiError::NotFound(format!("Recipe ID '{}' not found in database.", recipe_id))
    }

    pub fn status(&self) -> Status {
        match self {
            ApiError::Diesel(DieselError::NotFound) => Status::NotFound,
            ApiError::Diesel(_) => Status::InternalServerError,
            ApiError::Validation(_) => Status::UnprocessableEntity,
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::BadCredentials | ApiError::Unauthorized => Status::Unauthorized,
            ApiError::Internal => Status::InternalServerError,
        }
    }
}

impl From<DieselError> for ApiError {
    fn from(err: DieselError) -> ApiError {
        ApiError::Diesel(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> ApiError {
        ApiError::Validation(err)
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> ApiError {
        tracing::error!(error = %err, "password hashing failed");
        ApiError::Internal
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// Field name to the list of problems found with it.
#[derive(Debug, Serialize, Default, PartialEq)]
pub struct ValidationError(BTreeMap<String, Vec<String>>);

impl ValidationError {
    pub fn add_error<K: Into<String>, V: Into<String>>(&mut self, key: K, val: V) {
        self.0.entry(key.into()).or_default().push(val.into());
    }

    pub fn from<K: Into<String>, V: Into<String>>(key: K, val: V) -> Self {
        let mut error = ValidationError::default();
        error.add_error(key, val);
        error
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn merge(&mut self, other: ValidationError) {
        for (key, errors) in other.0.into_iter() {
            self.0.entry(key).or_default().extend(errors);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    pub fn messages(&self, key: &str) -> &[String] {
        self.0.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// `Ok(value)` when nothing was recorded, the collected errors otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        let body = match self {
            ApiError::Diesel(DieselError::NotFound) => json!({ "error": "Entity not found." }),
            ApiError::Diesel(error) => {
                tracing::error!(error = %error, "database error");
                json!({ "error": "Internal server error." })
            }
            ApiError::Validation(error) => json!({ "errors": error }),
            ApiError::NotFound(message) => json!({ "error": message }),
            ApiError::BadCredentials => {
                json!({ "error": "Invalid username or password. Try again." })
            }
            ApiError::Unauthorized => json!({ "error": "Unauthorized. Please log in." }),
            ApiError::Internal => json!({ "error": "Internal server error." }),
        };
        try_respond(req, body, status)
    }
}

impl<T> Validate for Json<T>
where
    T: Validate,
{
    type Error = <T as Validate>::Error;
    fn validate(self, connection: &mut SqliteConnection) -> Result<Self, Self::Error> {
        let inner = self.into_inner();
        let validated = inner.validate(connection)?;
        Ok(Json(validated))
    }
}
