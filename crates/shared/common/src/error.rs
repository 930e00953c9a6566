//! Unified error handling.
//!
//! Provides a single error type shared by the stores, the service layer
//! and the CLI. Store failures are forwarded unchanged.

use domain::DomainError;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Resource not found")]
    NotFound,

    // Validation
    #[error("{0}")]
    Validation(String),

    // Store errors
    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),
}

impl AppError {
    /// Get error code for callers
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            #[cfg(feature = "database")]
            AppError::Database(_) => "STORE_ERROR",
            AppError::InvalidId(_) => "STORE_ERROR",
        }
    }

    /// True for failures reported by the document store itself
    pub fn is_store_error(&self) -> bool {
        self.code() == "STORE_ERROR"
    }

    /// True for outcomes callers are expected to handle
    pub fn is_expected(&self) -> bool {
        matches!(self, AppError::NotFound | AppError::Validation(_))
    }

    /// Get user-facing message (hides driver details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            #[cfg(feature = "database")]
            AppError::Database(_) => "A database error occurred".to_string(),
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn invalid_id(id: impl Into<String>) -> Self {
        AppError::InvalidId(id.into())
    }
}
