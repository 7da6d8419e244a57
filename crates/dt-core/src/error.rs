//! # AppError
//!
//! Centralized error handling for the DittoTrip admin console.
//! Remote failures, transport failures and local validation all land here so
//! the presentation layer decides how to surface them.

use thiserror::Error;

/// Local validation failures, raised before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The picked item is already part of the selection set.
    #[error("item {id} is already added")]
    AlreadySelected { id: i64 },

    #[error("at most {limit} tags can be registered")]
    TagLimitReached { limit: usize },

    #[error("tag #{0} is already added")]
    DuplicateTag(String),

    #[error("tag must not be empty")]
    EmptyTag,

    /// A required form field was left blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0} must be a number")]
    InvalidNumber(&'static str),

    #[error("sub type does not belong to the selected major type")]
    SubTypeMismatch,

    #[error("page {requested} is out of range (total pages: {total})")]
    PageOutOfRange { requested: usize, total: usize },
}

/// The primary error type for all dt-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., a member id that no longer exists)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Missing/expired token or a 401/403 from the API
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Connection refused, timeout, undecodable body
    #[error("transport error: {0}")]
    Transport(String),

    /// Any other non-2xx answer from the API
    #[error("remote error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// Operation not allowed in the current state (e.g., double submit)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Local infrastructure failure (e.g., token file unreadable)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for failures the operator caused and can fix in the form.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

/// A specialized Result type for DittoTrip console logic.
pub type Result<T> = std::result::Result<T, AppError>;
