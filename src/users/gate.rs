use super::models::User;
use crate::types::ApiError;
use rocket::http::Method;
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest, Request};
use std::marker::PhantomData;

/// Decides which request methods must carry a session.
pub trait Policy: Send + Sync + 'static {
    fn requires_session(method: Method) -> bool;
}

/// Every method needs a session.
pub enum Always {}

/// Only state-changing methods need a session; reads pass through with an
/// optional user.
pub enum OnWrite {}

impl Policy for Always {
    fn requires_session(_method: Method) -> bool {
        true
    }
}

impl Policy for OnWrite {
    fn requires_session(method: Method) -> bool {
        matches!(
            method,
            Method::Post | Method::Put | Method::Patch | Method::Delete
        )
    }
}

/// Request guard that resolves the session user and rejects the request
/// with 401 when the policy demands a session and there is none.
pub struct Authorized<P: Policy = Always> {
    user: Option<User>,
    policy: PhantomData<P>,
}

impl<P: Policy> Authorized<P> {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn into_user(self) -> Result<User, ApiError> {
        self.user.ok_or(ApiError::Unauthorized)
    }
}

#[rocket::async_trait]
impl<'r, P: Policy> FromRequest<'r> for Authorized<P> {
    type Error = ApiError;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let required = P::requires_session(request.method());
        match request.guard::<User>().await {
            Outcome::Success(user) => Outcome::Success(Authorized {
                user: Some(user),
                policy: PhantomData,
            }),
            Outcome::Error((_, ApiError::Unauthorized)) if !required => {
                Outcome::Success(Authorized {
                    user: None,
                    policy: PhantomData,
                })
            }
            Outcome::Error((status, ApiError::Unauthorized)) => {
                tracing::warn!(method = %request.method(), uri = %request.uri(), "no session, request rejected");
                Outcome::Error((status, ApiError::Unauthorized))
            }
            Outcome::Error(failure) => Outcome::Error(failure),
            Outcome::Forward(status) => Outcome::Forward(status),
        }
    }
}
