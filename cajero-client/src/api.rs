//! Typed cashier API
//!
//! `CajeroApi` is the seam every controller talks to; `ApiClient` binds it
//! to the `/cajero/*` endpoints over any [`HttpClient`].

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::Ack;
use shared::models::{
    CashCloseRequest, DailySalesResponse, DateRange, Order, PaymentConfirmation, PaymentMethod,
    PaymentValidation, PaymentVerification, ProcessPaymentRequest, QrCode, ReportFormat,
};

use crate::http::{HttpClient, NetworkHttpClient};
use crate::{ClientError, ClientResult};

/// Operations the cashier front-end consumes from the backend
#[async_trait]
pub trait CajeroApi: Send + Sync {
    /// `GET /cajero/pedidos`
    async fn list_orders(&self) -> ClientResult<Vec<Order>>;

    /// `POST /cajero/procesar-pago` with `solo_validar: true`
    async fn validate_payment(
        &self,
        code: &str,
        method: PaymentMethod,
    ) -> ClientResult<PaymentValidation>;

    /// `POST /cajero/procesar-pago` without the validation flag
    async fn commit_payment(
        &self,
        code: &str,
        method: PaymentMethod,
    ) -> ClientResult<PaymentConfirmation>;

    /// `POST /cajero/generar-qr/{pedidoId}`
    async fn generate_qr(&self, order_id: i64) -> ClientResult<QrCode>;

    /// `POST /cajero/enviar-preparacion/{pedidoId}`
    async fn forward_to_preparation(&self, order_id: i64) -> ClientResult<()>;

    /// `GET /cajero/ventas-dia?fecha=YYYY-MM-DD`
    async fn daily_sales(&self, date: NaiveDate) -> ClientResult<DailySalesResponse>;

    /// `POST /cajero/cierre-caja`
    async fn close_cash(&self, request: &CashCloseRequest) -> ClientResult<()>;

    /// `GET /cajero/reporte-{excel|pdf}?fecha_inicio&fecha_fin`
    async fn report(&self, format: ReportFormat, range: DateRange) -> ClientResult<Vec<u8>>;

    /// `GET /cajero/verificar-pago/{numeroAtencion}`
    async fn verify_payment(&self, attention_number: &str) -> ClientResult<PaymentVerification>;
}

/// `CajeroApi` over HTTP
#[derive(Debug, Clone)]
pub struct ApiClient<H = NetworkHttpClient> {
    http: H,
}

impl<H: HttpClient> ApiClient<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &H {
        &self.http
    }
}

fn ack_to_result(ack: Ack) -> ClientResult<()> {
    if ack.is_rejected() {
        return Err(ClientError::Rejected(ack.message));
    }
    Ok(())
}

#[async_trait]
impl<H: HttpClient> CajeroApi for ApiClient<H> {
    async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        // Some deployments answer `null` when the queue is empty
        let orders: Option<Vec<Order>> = self.http.get("/cajero/pedidos").await?;
        Ok(orders.unwrap_or_default())
    }

    async fn validate_payment(
        &self,
        code: &str,
        method: PaymentMethod,
    ) -> ClientResult<PaymentValidation> {
        let body = ProcessPaymentRequest::validate_only(code, method);
        self.http.post("/cajero/procesar-pago", &body).await
    }

    async fn commit_payment(
        &self,
        code: &str,
        method: PaymentMethod,
    ) -> ClientResult<PaymentConfirmation> {
        let body = ProcessPaymentRequest::commit(code, method);
        self.http.post("/cajero/procesar-pago", &body).await
    }

    async fn generate_qr(&self, order_id: i64) -> ClientResult<QrCode> {
        self.http
            .post_empty(&format!("/cajero/generar-qr/{}", order_id))
            .await
    }

    async fn forward_to_preparation(&self, order_id: i64) -> ClientResult<()> {
        let ack: Option<Ack> = self
            .http
            .post_empty(&format!("/cajero/enviar-preparacion/{}", order_id))
            .await?;
        ack_to_result(ack.unwrap_or_default())
    }

    async fn daily_sales(&self, date: NaiveDate) -> ClientResult<DailySalesResponse> {
        let resp: Option<DailySalesResponse> = self
            .http
            .get(&format!("/cajero/ventas-dia?fecha={}", date.format("%Y-%m-%d")))
            .await?;
        Ok(resp.unwrap_or_default())
    }

    async fn close_cash(&self, request: &CashCloseRequest) -> ClientResult<()> {
        let ack: Option<Ack> = self.http.post("/cajero/cierre-caja", request).await?;
        ack_to_result(ack.unwrap_or_default())
    }

    async fn report(&self, format: ReportFormat, range: DateRange) -> ClientResult<Vec<u8>> {
        self.http
            .get_bytes(&format!("{}?{}", format.path(), range.query()))
            .await
    }

    async fn verify_payment(&self, attention_number: &str) -> ClientResult<PaymentVerification> {
        let number = attention_number.trim();
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ClientError::Validation(
                "Número de atención inválido".to_string(),
            ));
        }
        self.http
            .get(&format!("/cajero/verificar-pago/{}", number))
            .await
    }
}
