//! Error types for archive operations

use crate::error::AppError;

/// Result type for archive operations
pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while building archive reports and searches
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// A request date could not be parsed
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// Request parameters are inconsistent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A single collection query failed
    #[error("Fetch from {collection} failed: {message}")]
    FetchFailed { collection: String, message: String },

    /// Writing the audit record failed
    #[error("Failed to persist report audit: {0}")]
    PersistFailed(String),

    /// Export failed
    #[error("Export failed: {0}")]
    ExportFailed(String),
}

impl From<ArchiveError> for AppError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::InvalidDate { .. } | ArchiveError::InvalidRequest(_) => {
                AppError::Validation(err.to_string())
            }
            ArchiveError::FetchFailed { .. } | ArchiveError::PersistFailed(_) => {
                AppError::Database(err.to_string())
            }
            ArchiveError::ExportFailed(_) => AppError::Processing(err.to_string()),
        }
    }
}
