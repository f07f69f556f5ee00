// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0} cannot be empty.")]
    EmptyField(&'static str),

    #[error("{field} cannot exceed {max} characters.")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid status '{0}'. Must be one of todo, doing, done.")]
    InvalidStatus(String),

    #[error("Invalid deadline '{0}'. Please use YYYY-MM-DD.")]
    InvalidDeadline(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
