//! Errors shown to the user, with their exit codes

use std::io::ErrorKind;

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

pub type CliResult<T> = Result<T, CliError>;

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        Self::Infra(InfraError::Application(e))
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        Self::Infra(InfraError::from(e))
    }
}

impl CliError {
    /// sysexits code for the process exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { source, .. } if source.kind() == ErrorKind::NotFound => {
                    crate::exitcode::NOINPUT
                }
                InfraError::Io { .. } | InfraError::Walk { .. } => crate::exitcode::IOERR,
                InfraError::TooLarge { .. } => crate::exitcode::DATAERR,
                InfraError::Application(ApplicationError::Config { .. }) => {
                    crate::exitcode::CONFIG
                }
                InfraError::Application(ApplicationError::Domain(DomainError::InvalidInput(_))) => {
                    crate::exitcode::DATAERR
                }
                InfraError::Application(ApplicationError::Domain(_)) => crate::exitcode::SOFTWARE,
            },
        }
    }
}
