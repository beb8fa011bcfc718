//! Error envelope of the cashier backend
//!
//! Any non-success response is expected to carry a human-readable message.
//! Backends are not consistent about the key, so `error` and `mensaje` are
//! accepted too.

use serde::{Deserialize, Serialize};

/// Message shown when the backend did not say what went wrong
pub const GENERIC_ERROR_MESSAGE: &str = "No se pudo completar la operación";

/// Body of a non-success response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, alias = "error", alias = "mensaje")]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Parse a raw response body, tolerating non-JSON payloads.
    pub fn parse(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }

    /// The backend message, if it sent a non-blank one.
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// Acknowledgment returned by command endpoints (cash close, forward to
/// preparation)
///
/// Only an explicit `success: false` counts as a rejection; an empty body
/// is an acknowledgment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default, alias = "error", alias = "mensaje")]
    pub message: Option<String>,
}

impl Ack {
    pub fn is_rejected(&self) -> bool {
        self.success == Some(false)
    }
}
