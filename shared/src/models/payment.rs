//! Payment Model (procesar pago / QR / verificación)

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::order::Order;
use crate::util::string_or_number;

/// Payment method the cashier selects for an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "EFECTIVO")]
    Cash,
    #[serde(rename = "QR")]
    Qr,
    #[serde(rename = "TARJETA")]
    Card,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        Self::Cash
    }
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [Self::Cash, Self::Qr, Self::Card];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "EFECTIVO",
            Self::Qr => "QR",
            Self::Card => "TARJETA",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl std::str::FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EFECTIVO" => Ok(Self::Cash),
            "QR" => Ok(Self::Qr),
            "TARJETA" => Ok(Self::Card),
            _ => Err(UnknownPaymentMethod(s.to_string())),
        }
    }
}

/// Body of `POST /cajero/procesar-pago`
///
/// `solo_validar` is only sent for lookups; a commit omits the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessPaymentRequest {
    pub codigo: String,
    pub metodo_pago: PaymentMethod,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub solo_validar: bool,
}

impl ProcessPaymentRequest {
    pub fn validate_only(code: impl Into<String>, method: PaymentMethod) -> Self {
        Self {
            codigo: code.into(),
            metodo_pago: method,
            solo_validar: true,
        }
    }

    pub fn commit(code: impl Into<String>, method: PaymentMethod) -> Self {
        Self {
            codigo: code.into(),
            metodo_pago: method,
            solo_validar: false,
        }
    }
}

/// Response to a validate-only lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentValidation {
    #[serde(default)]
    pub valido: bool,
    #[serde(default)]
    pub pedido: Option<Order>,
    #[serde(default, alias = "error", alias = "mensaje")]
    pub message: Option<String>,
}

/// Response to a committed payment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub pedido: Option<Order>,
    #[serde(default, alias = "error", alias = "mensaje")]
    pub message: Option<String>,
}

/// QR payload generated by the backend for one order
///
/// `codigo_qr` is rendered as-is; the client never validates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrCode {
    pub codigo_qr: String,
    #[serde(default)]
    pub qr_data: Option<serde_json::Value>,
    #[serde(
        alias = "numeroAtencion",
        deserialize_with = "string_or_number"
    )]
    pub numero_atencion: String,
}

/// Decoded content of `qr_data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrData {
    #[serde(
        rename = "numeroAtencion",
        alias = "numero_atencion",
        deserialize_with = "string_or_number"
    )]
    pub attention_number: String,
    #[serde(rename = "cliente", alias = "nombre_cliente", default)]
    pub customer_name: String,
    #[serde(default)]
    pub total: f64,
}

impl QrCode {
    /// Decode `qr_data`, which arrives either as an object or as a JSON
    /// document embedded in a string.
    pub fn decode_data(&self) -> Result<Option<QrData>, serde_json::Error> {
        match &self.qr_data {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::String(raw)) => serde_json::from_str(raw).map(Some),
            Some(value) => QrData::deserialize(value).map(Some),
        }
    }
}

/// Response of `GET /cajero/verificar-pago/{numeroAtencion}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentVerification {
    #[serde(default)]
    pub pagado: bool,
    #[serde(default)]
    pub pedido: Option<Order>,
    #[serde(default, alias = "error", alias = "mensaje")]
    pub message: Option<String>,
}
