use thiserror::Error;

/// Failure reported by a [`crate::DocumentStore`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// A unique key (`id`, `email`) already exists.
    #[error("duplicate value for unique field `{field}`")]
    Duplicate { field: &'static str },

    /// The document targeted by an update does not exist.
    #[error("document not found")]
    NotFound,

    /// The underlying engine failed (connection, query, decoding).
    #[error("store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
