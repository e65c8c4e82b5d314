use chrono::{NaiveDateTime, SecondsFormat};
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use rocket::serde::json::{Json, Value};
use serde::Serializer;

pub fn try_respond(req: &Request, json: Value, status: Status) -> response::Result<'static> {
    let response = Json(json).respond_to(req)?;
    Response::build_from(response).status(status).ok()
}

/// Timestamps are stored as naive UTC; on the wire they are RFC 3339 with
/// millisecond precision.
pub fn serialize_date<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let s = date.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true);
    serializer.serialize_str(&s)
}
