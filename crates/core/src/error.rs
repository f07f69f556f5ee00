// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: i64 },

    /// Raised by stores only; services translate it into `Validation`.
    #[error("Unique constraint violation: {0}")]
    UniqueConstraint(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure class surfaced to adapters.
///
/// Adapters match on this exhaustively to pick a status or exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Entity id does not exist (404 class)
    NotFound,
    /// Input failed a syntactic or semantic rule (400 class)
    Validation,
    /// Input is well-formed but breaks a domain policy such as a cap (400 class)
    BusinessRule,
    /// Anything the caller cannot fix by changing input (500 class)
    Internal,
}

impl AppError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        AppError::NotFound { entity, id }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::Domain(_) | AppError::Validation(_) | AppError::UniqueConstraint(_) => {
                ErrorKind::Validation
            }
            AppError::BusinessRule(_) => ErrorKind::BusinessRule,
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Rewrap a store-level uniqueness conflict as a validation failure.
    ///
    /// Every other variant passes through unchanged.
    pub fn into_service_error(self) -> Self {
        match self {
            AppError::UniqueConstraint(msg) => AppError::Validation(msg),
            other => other,
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
