//! Error types for building and running an application.

use std::fmt::Debug;

use thiserror::Error;

/// Failures that abort registration or the run loop.
///
/// A function screen without an action is deliberately absent: it is
/// rendered in place and the loop carries on.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unknown screen '{id}': not registered with the application")]
    UnknownScreenId { id: String },

    #[error("Duplicate screen '{id}': already registered")]
    DuplicateScreenId { id: String },

    #[error("Interrupted by user")]
    Interrupted,

    #[error("IO error: {0}")]
    Io(std::io::Error),
}

impl AppError {
    pub fn unknown<Id: Debug>(id: &Id) -> Self {
        AppError::UnknownScreenId {
            id: format!("{:?}", id),
        }
    }

    pub fn duplicate<Id: Debug>(id: &Id) -> Self {
        AppError::DuplicateScreenId {
            id: format!("{:?}", id),
        }
    }
}

/// Ctrl+C surfaces from the input layer as `ErrorKind::Interrupted`.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::Interrupted {
            AppError::Interrupted
        } else {
            AppError::Io(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
