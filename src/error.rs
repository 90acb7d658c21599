//! The error type shared by every attendance operation.
//!
//! Validation and lookup failures carry a message meant for the person at the other end of the
//! request. Storage failures are logged where they are converted and only ever display a generic
//! message, so database internals never reach a client.

use crate::models::Status;
use thiserror::Error;
use tracing::error;

/// Everything that can go wrong while recording or reporting attendance.
#[derive(Error, Debug)]
pub enum AttendanceError {
    #[error("Invalid status '{0}'. Must be one of: {allowed}", allowed = Status::allowed())]
    InvalidStatus(String),

    #[error("Invalid period {0}. Must be between 1 and 5")]
    InvalidPeriod(i32),

    #[error("Invalid date format '{0}'. Use YYYY-MM-DD")]
    InvalidDateFormat(String),

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    /// A required text field was present but blank, e.g. `"Student name cannot be empty"`.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("Missing required fields: {0}")]
    MissingField(String),

    #[error("Student with ID {0} not found")]
    StudentNotFound(i32),

    #[error("Faculty with ID {0} not found")]
    FacultyNotFound(i32),

    #[error("Student with {field} {value} already exists")]
    DuplicateStudent { field: &'static str, value: String },

    /// The detail is kept for logs; clients only see the generic text.
    #[error("Database error, please try again later")]
    Storage(String),

    #[error("Failed to run database migrations: {0}")]
    Migration(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed")]
    Blocking,
}

impl AttendanceError {
    /// Whether this error was caused by user input rather than by the system.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidStatus(_)
                | Self::InvalidPeriod(_)
                | Self::InvalidDateFormat(_)
                | Self::InvalidEmail(_)
                | Self::EmptyField(_)
                | Self::MissingField(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::StudentNotFound(_) | Self::FacultyNotFound(_))
    }
}

impl From<diesel::result::Error> for AttendanceError {
    fn from(err: diesel::result::Error) -> Self {
        error!(error = %err, "database query failed");
        Self::Storage(err.to_string())
    }
}

impl From<diesel::r2d2::PoolError> for AttendanceError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        error!(error = %err, "could not check out a database connection");
        Self::Storage(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AttendanceError>;
