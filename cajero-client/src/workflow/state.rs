//! Workflow states and events

use shared::models::{Order, PaymentMethod};

/// Where the current payment attempt stands
///
/// `Idle → Searching → Found → Processing → Confirmed`, and back to `Idle`
/// on reset or after the order is forwarded to preparation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    /// Validate-only lookup in flight
    Searching,
    /// Lookup succeeded; the order snapshot is ready to be paid
    Found(Order),
    /// Commit in flight
    Processing(Order),
    /// Backend acknowledged the payment
    Confirmed(Order),
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Searching => "searching",
            Self::Found(_) => "found",
            Self::Processing(_) => "processing",
            Self::Confirmed(_) => "confirmed",
        }
    }

    /// The order the attempt resolved to, if any
    pub fn order(&self) -> Option<&Order> {
        match self {
            Self::Found(o) | Self::Processing(o) | Self::Confirmed(o) => Some(o),
            Self::Idle | Self::Searching => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Client-only input of one payment attempt
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentAttempt {
    pub code: String,
    pub method: PaymentMethod,
}

/// Published when the backend state of an order changed and order lists
/// should be re-fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowEvent {
    OrdersChanged { order_id: i64 },
}
