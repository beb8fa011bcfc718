//! Daily sales summary view model (ventas del día)

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use shared::models::{
    DailySalesResponse, DateRange, KNOWN_SALES_METHODS, MethodTotals, ReportFormat, Sale,
};

use crate::ClientResult;
use crate::api::CajeroApi;
use crate::money::{to_decimal, to_f64};
use crate::report::{ExportError, RenderedReport, ReportSink, export_report};

/// Current calendar date in the cashier's local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Normalized daily sales, ready for display
///
/// Every known method key is always present, so display code never has
/// to treat a missing method as a special case.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySales {
    pub date: NaiveDate,
    /// Sales in the order the backend returned them
    pub sales: Vec<Sale>,
    pub by_method: BTreeMap<String, MethodTotals>,
    pub grand_total: f64,
}

impl DailySales {
    /// Zero-valued summary for `date`
    pub fn zeroed(date: NaiveDate) -> Self {
        Self {
            date,
            sales: Vec::new(),
            by_method: KNOWN_SALES_METHODS
                .iter()
                .map(|k| (k.to_string(), MethodTotals::default()))
                .collect(),
            grand_total: 0.0,
        }
    }

    pub fn from_response(date: NaiveDate, resp: DailySalesResponse) -> Self {
        let mut by_method = resp.resumen.unwrap_or_default();
        for key in KNOWN_SALES_METHODS {
            by_method.entry(key.to_string()).or_default();
        }
        let grand_total = resp.total_dia.unwrap_or_else(|| {
            to_f64(by_method.values().map(|m| to_decimal(m.total)).sum())
        });
        Self {
            date,
            sales: resp.ventas.unwrap_or_default(),
            by_method,
            grand_total,
        }
    }

    /// Totals for one method key; zero when the key is unknown
    pub fn method(&self, key: &str) -> MethodTotals {
        self.by_method.get(key).copied().unwrap_or_default()
    }

    pub fn sale_count(&self) -> usize {
        self.sales.len()
    }
}

pub struct SalesViewModel<A: CajeroApi> {
    api: Arc<A>,
    current: DailySales,
}

impl<A: CajeroApi> SalesViewModel<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            current: DailySales::zeroed(today()),
        }
    }

    pub fn current(&self) -> &DailySales {
        &self.current
    }

    /// Load the sales of `date` (today when `None`).
    ///
    /// On failure the view model holds the zero-valued summary for that
    /// date and the error is returned for display.
    pub async fn load(&mut self, date: Option<NaiveDate>) -> ClientResult<&DailySales> {
        let date = date.unwrap_or_else(today);
        match self.api.daily_sales(date).await {
            Ok(resp) => {
                self.current = DailySales::from_response(date, resp);
                tracing::info!(
                    date = %date,
                    sales = self.current.sale_count(),
                    total = self.current.grand_total,
                    "Daily sales loaded"
                );
                Ok(&self.current)
            }
            Err(e) => {
                self.current = DailySales::zeroed(date);
                tracing::warn!(date = %date, error = %e, "Daily sales load failed");
                Err(e)
            }
        }
    }

    /// Request a rendered report and hand it to `sink`.
    pub async fn export<S: ReportSink + ?Sized>(
        &self,
        format: ReportFormat,
        range: DateRange,
        sink: &S,
    ) -> Result<RenderedReport, ExportError> {
        export_report(self.api.as_ref(), format, range, sink).await
    }
}
