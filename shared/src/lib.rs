//! Shared types for the cajero workspace
//!
//! Wire DTOs for the cashier backend contract: orders, payment methods,
//! QR payloads, daily sales, cash close and reports, plus the error
//! envelope every non-success response carries.

pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use response::{Ack, ApiErrorBody, GENERIC_ERROR_MESSAGE};
pub use serde::{Deserialize, Serialize};
