//! Data models
//!
//! Shared between the cashier client and the backend contract (via API).
//! Rust field names are English; serde renames map them to the wire keys.

pub mod cash_close;
pub mod order;
pub mod payment;
pub mod report;
pub mod sales;

// Re-exports
pub use cash_close::*;
pub use order::*;
pub use payment::*;
pub use report::*;
pub use sales::*;
