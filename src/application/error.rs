//! Session-level errors

use thiserror::Error;

use crate::domain::DomainError;

/// Failures of a session or of loaded settings. Tree errors pass through
/// unchanged.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;
