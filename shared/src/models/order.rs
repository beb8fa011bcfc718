//! Order Model (pedidos)

use serde::{Deserialize, Serialize};

use crate::util::string_or_number;

/// Order lifecycle status, owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "PENDIENTE")]
    Pending,
    #[serde(rename = "PAGADO")]
    Paid,
    #[serde(rename = "EN_PREPARACION")]
    InPreparation,
    #[serde(rename = "LISTO")]
    Ready,
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDIENTE",
            Self::Paid => "PAGADO",
            Self::InPreparation => "EN_PREPARACION",
            Self::Ready => "LISTO",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order snapshot as returned by the backend
///
/// The client never mutates it; a fresh copy replaces it on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    /// Human-facing sequence number printed on the ticket
    #[serde(
        rename = "numeroAtencion",
        alias = "numero_atencion",
        deserialize_with = "string_or_number"
    )]
    pub attention_number: String,
    #[serde(
        rename = "cliente",
        alias = "nombre_cliente",
        alias = "clienteNombre",
        default
    )]
    pub customer_name: String,
    #[serde(default)]
    pub total: f64,
    #[serde(rename = "estado", default)]
    pub status: OrderStatus,
    /// Creation time (ISO 8601)
    #[serde(rename = "createdAt", alias = "created_at", default)]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_from_backend_json() {
        let json = r#"{
            "id": 7,
            "numeroAtencion": 15,
            "cliente": "Ana",
            "total": 4500,
            "estado": "EN_PREPARACION",
            "createdAt": "2024-01-01T12:00:00Z"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, 7);
        assert_eq!(order.attention_number, "15");
        assert_eq!(order.customer_name, "Ana");
        assert_eq!(order.total, 4500.0);
        assert_eq!(order.status, OrderStatus::InPreparation);
    }

    #[test]
    fn test_order_snake_case_keys() {
        let json = r#"{"id":1,"numero_atencion":"A-3","nombre_cliente":"Luis","estado":"PAGADO"}"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.attention_number, "A-3");
        assert_eq!(order.customer_name, "Luis");
        assert_eq!(order.total, 0.0);
        assert_eq!(order.status, OrderStatus::Paid);
        assert!(order.created_at.is_none());
    }
}
