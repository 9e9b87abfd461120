//! Request extractors: the acting identity and JSON bodies that fail with
//! [`AppError`] instead of axum's plain-text rejections.

use api::Identity;
use axum::{
    extract::{FromRequest, FromRequestParts},
    http::{
        header::{AUTHORIZATION, USER_AGENT},
        request::Parts,
    },
};
use store::DocumentStore;

use crate::error::AppError;
use crate::state::AppState;

/// Who is calling, resolved from the `Authorization` and `User-Agent` headers.
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub Identity);

impl<S: DocumentStore> FromRequestParts<AppState<S>> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let authorization = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| {
                api::ApiError::Auth("malformed authorization header".to_string())
            })?),
            None => None,
        };
        let user_agent = parts
            .headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok());

        let identity = state.authenticator.authenticate(authorization, user_agent)?;
        Ok(Caller(identity))
    }
}

/// `axum::Json` whose rejections (bad syntax, unknown fields, wrong content
/// type) become 400 responses with a JSON error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Body<T>(pub T);
