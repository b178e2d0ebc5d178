use revmod_core::{repositories::Error as RepoError, usecases::Error as ParameterError};
use thiserror::Error;

pub use revmod_core::repositories;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> AppError {
        AppError::Business(BError::Repo(err))
    }
}

impl From<ParameterError> for AppError {
    fn from(err: ParameterError) -> AppError {
        match err {
            ParameterError::Repo(err) => err.into(),
            err => AppError::Business(err.into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Business(#[from] BError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum BError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error(transparent)]
    Repo(#[from] repositories::Error),
}

/// Coarse classification of errors for presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    InvalidState,
    Validation,
    Internal,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Business(BError::Parameter(err)) => match err {
                ParameterError::Forbidden => ErrorKind::Forbidden,
                ParameterError::InvalidState(_) => ErrorKind::InvalidState,
                ParameterError::UserDoesNotExist => ErrorKind::NotFound,
                ParameterError::Repo(err) => repo_error_kind(err),
                _ => ErrorKind::Validation,
            },
            Self::Business(BError::Repo(err)) => repo_error_kind(err),
            Self::Other(_) => ErrorKind::Internal,
        }
    }
}

fn repo_error_kind(err: &RepoError) -> ErrorKind {
    match err {
        RepoError::NotFound => ErrorKind::NotFound,
        RepoError::AlreadyExists => ErrorKind::Validation,
        RepoError::Other(_) => ErrorKind::Internal,
    }
}
