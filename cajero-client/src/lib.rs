//! Cajero Client - cashier-side binding for the POS backend
//!
//! Typed HTTP calls to the `/cajero` API plus the view state a cashier
//! screen needs: the payment workflow, the open order list, the daily
//! sales summary, cash close and report export.

pub mod api;
pub mod cash_close;
pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod money;
pub mod orders;
pub mod report;
pub mod sales;
pub mod workflow;

#[cfg(test)]
mod mock;

pub use api::{ApiClient, CajeroApi};
pub use cash_close::{CashClose, CashCloseForm, CashClosePreview};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use format::format_clp;
pub use http::{HttpClient, NetworkHttpClient};
pub use orders::OrderList;
pub use report::{ExportError, FileSink, RenderedReport, ReportSink, export_report};
pub use sales::{DailySales, SalesViewModel};
pub use workflow::{PaymentAttempt, PaymentWorkflow, WorkflowError, WorkflowEvent, WorkflowState};

// Re-export shared types for convenience
pub use shared::models::{DateRange, Order, OrderStatus, PaymentMethod, QrCode, ReportFormat};
