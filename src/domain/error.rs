// src/domain/error.rs
use crate::domain::bookmark::BookmarkBuilderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    #[error("Tag operation failed: {0}")]
    TagOperationFailed(String),

    #[error("Bookmark operation failed: {0}")]
    BookmarkOperationFailed(String),

    #[error("Bookmark not found: {0}")]
    BookmarkNotFound(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<BookmarkBuilderError> for DomainError {
    fn from(e: BookmarkBuilderError) -> Self {
        DomainError::BookmarkOperationFailed(e.to_string())
    }
}

impl DomainError {
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        match self {
            DomainError::Other(msg) => DomainError::Other(format!("{}: {}", context.into(), msg)),
            DomainError::RepositoryError(msg) => {
                DomainError::RepositoryError(format!("{}: {}", context.into(), msg))
            }
            err => DomainError::Other(format!("{}: {}", context.into(), err)),
        }
    }
}
