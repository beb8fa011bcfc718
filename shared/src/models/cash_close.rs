//! Cash Close Model (cierre de caja)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Declared totals sent with a cash close
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashCloseTotals {
    pub efectivo: f64,
    /// Card network (Transbank) total
    pub transbank: f64,
    pub otros: f64,
    #[serde(default)]
    pub notas: String,
    #[serde(rename = "totalDeclarado")]
    pub total_declared: f64,
}

/// Body of `POST /cajero/cierre-caja`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashCloseRequest {
    /// Business date (YYYY-MM-DD)
    pub fecha: NaiveDate,
    pub totales: CashCloseTotals,
}
