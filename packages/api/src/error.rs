//! Error taxonomy shared by every component.
//!
//! Each variant maps to exactly one HTTP status in the server crate. Store
//! failures are logged here, at the conversion point, and reach callers as
//! [`ApiError::Internal`] without the underlying detail.

use store::StoreError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// Malformed, missing or pattern-mismatched input.
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid or expired credentials.
    #[error("{0}")]
    Auth(String),

    /// Authenticated, but not allowed to touch this resource.
    #[error("{0}")]
    Forbidden(String),

    /// Uniqueness violation.
    #[error("{0}")]
    Conflict(String),

    /// Referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Store or infrastructure failure; the message is safe to show.
    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: &str) -> Self {
        Self::NotFound(format!("{what} not found"))
    }

    /// Convert a store error, naming `what` when the target document is missing.
    pub(crate) fn from_store(what: &'static str) -> impl Fn(StoreError) -> ApiError {
        move |err| match err {
            StoreError::NotFound => ApiError::not_found(what),
            other => other.into(),
        }
    }
}

/// Parse a path or body identifier. Anything that is not a UUID cannot name an
/// existing document, so it is reported as missing.
pub(crate) fn parse_id(raw: &str, what: &str) -> ApiResult<uuid::Uuid> {
    uuid::Uuid::parse_str(raw.trim()).map_err(|_| ApiError::not_found(what))
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { field } => {
                ApiError::Conflict(format!("an account with this {field} already exists"))
            }
            StoreError::NotFound => ApiError::NotFound("not found".to_string()),
            StoreError::Backend(detail) => {
                tracing::error!("store failure: {}", detail);
                ApiError::Internal("internal server error".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        assert!(matches!(
            ApiError::from(StoreError::Duplicate { field: "email" }),
            ApiError::Conflict(msg) if msg.contains("email")
        ));
        assert!(matches!(
            ApiError::from(StoreError::NotFound),
            ApiError::NotFound(_)
        ));

        let internal = ApiError::from(StoreError::Backend("connection reset by peer".into()));
        assert_eq!(internal, ApiError::Internal("internal server error".into()));
    }

    #[test]
    fn test_from_store_names_missing_document() {
        assert_eq!(
            ApiError::from_store("food truck")(StoreError::NotFound),
            ApiError::NotFound("food truck not found".into())
        );
        assert!(matches!(
            ApiError::from_store("user")(StoreError::Backend("timeout".into())),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_unparsable_id_is_not_found() {
        assert_eq!(
            parse_id("12", "review"),
            Err(ApiError::NotFound("review not found".into()))
        );
    }
}
