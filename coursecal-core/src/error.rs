//! Error types for coursecal.

use thiserror::Error;

/// Errors that can occur in coursecal operations.
#[derive(Error, Debug)]
pub enum CourseCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} already exists: {id}")]
    Conflict { kind: &'static str, id: String },

    #[error("Invalid data: {0}")]
    Validation(String),

    #[error("Invalid temporal value: {0}")]
    InvalidTemporal(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CourseCalError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        CourseCalError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Result type alias for coursecal operations.
pub type CourseCalResult<T> = Result<T, CourseCalError>;
