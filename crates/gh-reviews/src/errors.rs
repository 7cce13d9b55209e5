//! Error taxonomy for the reviews binding

use thiserror::Error;

/// Errors raised by review operations and the request executor
#[derive(Error, Debug)]
pub enum ReviewsError {
    #[error("Invalid repository reference: {0}")]
    InvalidRepository(String),

    #[error("Authentication failed: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Rate limit exhausted ({status}): {message}")]
    RateLimited { status: u16, message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] octocrab::Error),
}

impl ReviewsError {
    /// HTTP status associated with the error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ReviewsError::Unauthorized { .. } => Some(401),
            ReviewsError::Forbidden { .. } => Some(403),
            ReviewsError::NotFound { .. } => Some(404),
            ReviewsError::Validation { .. } => Some(422),
            ReviewsError::RateLimited { status, .. } | ReviewsError::Api { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ReviewsError::NotFound { .. })
    }
}

pub type Result<T, E = ReviewsError> = std::result::Result<T, E>;
