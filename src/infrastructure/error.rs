//! Errors from reading datasets off disk

use std::path::PathBuf;

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("weight of {path} does not fit: {size} bytes")]
    TooLarge { path: PathBuf, size: u64 },
}

impl InfraError {
    /// `context` names what was being read or written.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

impl From<DomainError> for InfraError {
    fn from(e: DomainError) -> Self {
        Self::Application(ApplicationError::Domain(e))
    }
}

pub type InfraResult<T> = Result<T, InfraError>;
