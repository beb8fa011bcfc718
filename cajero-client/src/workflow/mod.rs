//! Payment workflow
//!
//! search → validate → pay → confirm → forward to kitchen, for one order
//! at a time. The controller owns the state machine; UI layers only read
//! [`WorkflowState`] and subscribe to [`WorkflowEvent`]s.

mod controller;
mod error;
mod state;

pub use controller::PaymentWorkflow;
pub use error::WorkflowError;
pub use state::{PaymentAttempt, WorkflowEvent, WorkflowState};
