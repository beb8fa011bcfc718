//! Client error types

use shared::GENERIC_ERROR_MESSAGE;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Non-success status from the backend
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or(GENERIC_ERROR_MESSAGE))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// The backend answered 2xx but refused the command (`success: false`)
    #[error("Rejected: {}", .0.as_deref().unwrap_or(GENERIC_ERROR_MESSAGE))]
    Rejected(Option<String>),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Local input validation, never reaches the network
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Http(err)
        }
    }
}

impl ClientError {
    /// Message to show the cashier.
    ///
    /// Backend and validation messages pass through verbatim; anything
    /// unexpected collapses to the generic message.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api {
                message: Some(m), ..
            }
            | ClientError::Rejected(Some(m))
            | ClientError::Validation(m) => m.clone(),
            ClientError::Timeout => "El servidor no respondió a tiempo".to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Api { status: 401, .. })
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
