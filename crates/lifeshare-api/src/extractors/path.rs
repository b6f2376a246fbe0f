//! Typed path parameter helpers.

use uuid::Uuid;

use lifeshare_core::error::AppError;

/// Parses a typed identifier from a path segment.
pub fn parse_id<T: From<Uuid>>(raw: &str) -> Result<T, AppError> {
    Uuid::parse_str(raw)
        .map(T::from)
        .map_err(|_| AppError::validation(format!("Invalid ID: {raw}")))
}
