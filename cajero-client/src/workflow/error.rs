//! Workflow error types

use shared::GENERIC_ERROR_MESSAGE;
use thiserror::Error;

use crate::ClientError;

/// Workflow error type
///
/// None of these are fatal: the controller is always left in its previous
/// stable state and the cashier may retry.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Blank payment code, rejected before any network call
    #[error("Payment code is empty")]
    EmptyCode,

    /// Another operation of this controller is still in flight
    #[error("Operation '{op}' rejected: another request is in flight")]
    Busy { op: &'static str },

    #[error("Operation '{op}' not allowed in state '{state}'")]
    InvalidState {
        op: &'static str,
        state: &'static str,
    },

    #[error("Order {got} does not match the current order {expected}")]
    OrderMismatch { expected: i64, got: i64 },

    /// Backend answered `valido: false` or `success: false`
    #[error("Rejected by backend: {}", .0.as_deref().unwrap_or(GENERIC_ERROR_MESSAGE))]
    Rejected(Option<String>),

    /// A reset happened while the request was in flight; its result was
    /// discarded
    #[error("Operation discarded by reset")]
    Discarded,

    #[error("Client error: {0}")]
    Client(#[from] ClientError),
}

impl WorkflowError {
    /// Message to show the cashier
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::EmptyCode => "Ingrese el código del pedido".to_string(),
            WorkflowError::Busy { .. } => "Espere a que termine la operación en curso".to_string(),
            WorkflowError::InvalidState { .. } | WorkflowError::OrderMismatch { .. } => {
                "La operación no está disponible en este momento".to_string()
            }
            WorkflowError::Rejected(Some(m)) => m.clone(),
            WorkflowError::Rejected(None) | WorkflowError::Discarded => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
            WorkflowError::Client(e) => e.user_message(),
        }
    }
}
