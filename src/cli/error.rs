// src/cli/error.rs
use crate::application::error::ApplicationError;
use crate::domain::error::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

pub type CliResult<T> = Result<T, CliError>;
