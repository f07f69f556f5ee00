//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use tracing::error;
use tracker_core::error::{AppError, ErrorKind};

/// RPC Error Codes (HTTP class in the last three digits)
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const BUSINESS_RULE: i32 = 4001;
    pub const NOT_FOUND: i32 = 4004;
    pub const INTERNAL_ERROR: i32 = 5000;
}

/// Error code for a failure class
pub fn code_for(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::NotFound => code::NOT_FOUND,
        ErrorKind::Validation => code::VALIDATION_ERROR,
        ErrorKind::BusinessRule => code::BUSINESS_RULE,
        ErrorKind::Internal => code::INTERNAL_ERROR,
    }
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    let kind = err.kind();
    if kind == ErrorKind::Internal {
        error!(error = %err, "Request failed with internal error");
    }
    ErrorObjectOwned::owned(code_for(kind), err.to_string(), None::<()>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::domain::DomainError;

    #[test]
    fn test_codes_follow_kind() {
        assert_eq!(
            to_rpc_error(AppError::not_found("Task", 1)).code(),
            code::NOT_FOUND
        );
        assert_eq!(
            to_rpc_error(DomainError::EmptyField("Task title").into()).code(),
            code::VALIDATION_ERROR
        );
        assert_eq!(
            to_rpc_error(AppError::UniqueConstraint("dup".into())).code(),
            code::VALIDATION_ERROR
        );
        assert_eq!(
            to_rpc_error(AppError::BusinessRule("cap".into())).code(),
            code::BUSINESS_RULE
        );
        assert_eq!(
            to_rpc_error(AppError::Database("locked".into())).code(),
            code::INTERNAL_ERROR
        );
    }

    #[test]
    fn test_message_is_kept() {
        let err = to_rpc_error(AppError::not_found("Project", 7));
        assert_eq!(err.message(), "Project not found (id=7)");
    }
}
