//! Cash close (cierre de caja)
//!
//! The cashier types the counted totals per method; the declared total is
//! shown next to the system total before submitting. A mismatch is
//! informational and never blocks the submission.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::{CashCloseRequest, CashCloseTotals};

use crate::api::CajeroApi;
use crate::money::{MONEY_TOLERANCE, parse_amount, to_decimal, to_f64};
use crate::sales::DailySales;
use crate::{ClientError, ClientResult};

/// Raw form input, kept as typed so a failed submit loses nothing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CashCloseForm {
    pub efectivo: String,
    pub transbank: String,
    pub otros: String,
    pub notas: String,
}

impl CashCloseForm {
    /// Blank or non-numeric fields count as zero
    fn declared(&self) -> Decimal {
        parse_amount(&self.efectivo) + parse_amount(&self.transbank) + parse_amount(&self.otros)
    }

    pub fn total_declared(&self) -> f64 {
        to_f64(self.declared())
    }

    /// Reject negative amounts before anything is sent
    pub fn validate(&self) -> ClientResult<()> {
        for (field, raw) in [
            ("efectivo", &self.efectivo),
            ("transbank", &self.transbank),
            ("otros", &self.otros),
        ] {
            if parse_amount(raw) < Decimal::ZERO {
                return Err(ClientError::Validation(format!(
                    "El monto de {} no puede ser negativo",
                    field
                )));
            }
        }
        Ok(())
    }

    pub fn totals(&self) -> CashCloseTotals {
        CashCloseTotals {
            efectivo: to_f64(parse_amount(&self.efectivo)),
            transbank: to_f64(parse_amount(&self.transbank)),
            otros: to_f64(parse_amount(&self.otros)),
            notas: self.notas.trim().to_string(),
            total_declared: self.total_declared(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Declared vs. system total, shown before the cashier confirms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashClosePreview {
    pub declared: f64,
    pub system: f64,
    /// declared - system
    pub difference: f64,
}

impl CashClosePreview {
    pub fn new(declared: f64, system: f64) -> Self {
        Self {
            declared,
            system,
            difference: to_f64(to_decimal(declared) - to_decimal(system)),
        }
    }

    pub fn matches(&self) -> bool {
        to_decimal(self.difference).abs() < MONEY_TOLERANCE
    }
}

pub struct CashClose<A: CajeroApi> {
    api: Arc<A>,
    form: CashCloseForm,
}

impl<A: CajeroApi> CashClose<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            form: CashCloseForm::default(),
        }
    }

    pub fn form(&self) -> &CashCloseForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CashCloseForm {
        &mut self.form
    }

    pub fn preview(&self, system_total: f64) -> CashClosePreview {
        CashClosePreview::new(self.form.total_declared(), system_total)
    }

    /// Fetch the system total of `date` and compare it with the form.
    pub async fn review(&self, date: NaiveDate) -> ClientResult<CashClosePreview> {
        let resp = self.api.daily_sales(date).await?;
        let system = DailySales::from_response(date, resp).grand_total;
        Ok(self.preview(system))
    }

    /// Submit the declaration for `date`.
    ///
    /// The form is cleared on success and left untouched on failure.
    pub async fn submit(&mut self, date: NaiveDate) -> ClientResult<CashCloseTotals> {
        self.form.validate()?;
        let request = CashCloseRequest {
            fecha: date,
            totales: self.form.totals(),
        };

        match self.api.close_cash(&request).await {
            Ok(()) => {
                tracing::info!(
                    target: "audit",
                    date = %date,
                    efectivo = request.totales.efectivo,
                    transbank = request.totales.transbank,
                    otros = request.totales.otros,
                    declared = request.totales.total_declared,
                    "Cash close submitted"
                );
                self.form.clear();
                Ok(request.totales)
            }
            Err(e) => {
                tracing::warn!(date = %date, error = %e, "Cash close failed, form kept");
                Err(e)
            }
        }
    }
}
