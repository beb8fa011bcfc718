//! Daily Sales Model (ventas del día)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::util::string_or_number;

/// Method keys the sales summary always exposes, even on an empty day.
///
/// These are the backend's aggregation keys, which differ from the
/// payment methods a cashier selects (card payments settle as `webpay`).
pub const KNOWN_SALES_METHODS: [&str; 3] = ["EFECTIVO", "webpay", "QR"];

/// One sale of the day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    /// Time of the sale as shown to the cashier (e.g. "13:45")
    #[serde(rename = "hora", alias = "fecha", default)]
    pub time: String,
    #[serde(
        rename = "numeroAtencion",
        alias = "numero_atencion",
        deserialize_with = "string_or_number"
    )]
    pub attention_number: String,
    #[serde(rename = "cliente", alias = "nombre_cliente", default)]
    pub customer_name: String,
    #[serde(rename = "metodoPago", alias = "metodo_pago", default)]
    pub method: String,
    #[serde(rename = "monto", alias = "total", default)]
    pub amount: f64,
}

/// Aggregate for one payment method
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodTotals {
    #[serde(default)]
    pub total: f64,
    #[serde(default, alias = "cantidad")]
    pub count: u32,
}

/// Raw response of `GET /cajero/ventas-dia`
///
/// Every field may be missing; the client normalizes the absence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailySalesResponse {
    #[serde(default)]
    pub ventas: Option<Vec<Sale>>,
    #[serde(default)]
    pub resumen: Option<BTreeMap<String, MethodTotals>>,
    #[serde(rename = "totalDia", alias = "total_dia", default)]
    pub total_dia: Option<f64>,
}
