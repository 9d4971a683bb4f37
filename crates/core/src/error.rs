//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (missing
/// entities, conflicts, cap violations). Infrastructure concerns belong
/// elsewhere. Every variant is terminal and reported synchronously; there is
/// no retry machinery at this layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A cart or product id is unknown. Also covers a catalog product
    /// vanishing under a live cart (treated as not-found, not as an internal
    /// error).
    #[error("not found")]
    NotFound,

    /// A conflicting state exists (duplicate active cart for a user,
    /// insufficient stock on replace/pay).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The request is rejected as-is (empty cart at pay time, quantity caps
    /// exceeded, non-positive quantity).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The cart expired by inactivity and was removed on access.
    #[error("gone: cart expired by inactivity")]
    Gone,

    /// An identifier was invalid (e.g. parse failure at the boundary).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
