//! Scripted `CajeroApi` for unit tests
//!
//! Each endpoint pops its next response from a queue and every call is
//! recorded, so tests can assert both outcomes and traffic.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::models::{
    CashCloseRequest, DailySalesResponse, DateRange, Order, OrderStatus, PaymentConfirmation,
    PaymentMethod, PaymentValidation, PaymentVerification, QrCode, ReportFormat,
};
use tokio::sync::Notify;

use crate::api::CajeroApi;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    ListOrders,
    Validate { code: String, method: PaymentMethod },
    Commit { code: String, method: PaymentMethod },
    GenerateQr(i64),
    Forward(i64),
    DailySales(NaiveDate),
    CloseCash(CashCloseRequest),
    Report(ReportFormat, DateRange),
    Verify(String),
}

type Queue<T> = Mutex<VecDeque<ClientResult<T>>>;

#[derive(Default)]
pub(crate) struct MockApi {
    calls: Mutex<Vec<Call>>,
    orders: Queue<Vec<Order>>,
    validations: Queue<PaymentValidation>,
    confirmations: Queue<PaymentConfirmation>,
    qr_codes: Queue<QrCode>,
    forwards: Queue<()>,
    sales: Queue<DailySalesResponse>,
    closes: Queue<()>,
    reports: Queue<Vec<u8>>,
    validation_gate: Mutex<Option<Arc<Notify>>>,
    commit_gate: Mutex<Option<Arc<Notify>>>,
    forward_gate: Mutex<Option<Arc<Notify>>>,
}

pub(crate) fn order(id: i64, number: &str) -> Order {
    Order {
        id,
        attention_number: number.to_string(),
        customer_name: "Ana".to_string(),
        total: 4500.0,
        status: OrderStatus::Pending,
        created_at: None,
    }
}

fn pop<T>(queue: &Queue<T>, what: &str) -> ClientResult<T> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(ClientError::InvalidResponse(format!("no scripted {}", what))))
}

impl MockApi {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub(crate) fn push_orders(&self, r: ClientResult<Vec<Order>>) {
        self.orders.lock().unwrap().push_back(r);
    }

    pub(crate) fn push_validation(&self, r: ClientResult<PaymentValidation>) {
        self.validations.lock().unwrap().push_back(r);
    }

    pub(crate) fn push_confirmation(&self, r: ClientResult<PaymentConfirmation>) {
        self.confirmations.lock().unwrap().push_back(r);
    }

    pub(crate) fn push_qr(&self, r: ClientResult<QrCode>) {
        self.qr_codes.lock().unwrap().push_back(r);
    }

    pub(crate) fn push_forward(&self, r: ClientResult<()>) {
        self.forwards.lock().unwrap().push_back(r);
    }

    pub(crate) fn push_sales(&self, r: ClientResult<DailySalesResponse>) {
        self.sales.lock().unwrap().push_back(r);
    }

    pub(crate) fn push_close(&self, r: ClientResult<()>) {
        self.closes.lock().unwrap().push_back(r);
    }

    pub(crate) fn push_report(&self, r: ClientResult<Vec<u8>>) {
        self.reports.lock().unwrap().push_back(r);
    }

    /// Hold validate calls until the returned `Notify` fires
    pub(crate) fn gate_validations(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.validation_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Hold commit calls until the returned `Notify` fires
    pub(crate) fn gate_commits(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.commit_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Hold forward calls until the returned `Notify` fires
    pub(crate) fn gate_forwards(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.forward_gate.lock().unwrap() = Some(gate.clone());
        gate
    }
}

async fn pass(gate: &Mutex<Option<Arc<Notify>>>) {
    let gate = gate.lock().unwrap().clone();
    if let Some(gate) = gate {
        gate.notified().await;
    }
}

#[async_trait]
impl CajeroApi for MockApi {
    async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        self.record(Call::ListOrders);
        pop(&self.orders, "orders")
    }

    async fn validate_payment(
        &self,
        code: &str,
        method: PaymentMethod,
    ) -> ClientResult<PaymentValidation> {
        self.record(Call::Validate {
            code: code.to_string(),
            method,
        });
        pass(&self.validation_gate).await;
        pop(&self.validations, "validation")
    }

    async fn commit_payment(
        &self,
        code: &str,
        method: PaymentMethod,
    ) -> ClientResult<PaymentConfirmation> {
        self.record(Call::Commit {
            code: code.to_string(),
            method,
        });
        pass(&self.commit_gate).await;
        pop(&self.confirmations, "confirmation")
    }

    async fn generate_qr(&self, order_id: i64) -> ClientResult<QrCode> {
        self.record(Call::GenerateQr(order_id));
        pop(&self.qr_codes, "qr")
    }

    async fn forward_to_preparation(&self, order_id: i64) -> ClientResult<()> {
        self.record(Call::Forward(order_id));
        pass(&self.forward_gate).await;
        pop(&self.forwards, "forward")
    }

    async fn daily_sales(&self, date: NaiveDate) -> ClientResult<DailySalesResponse> {
        self.record(Call::DailySales(date));
        pop(&self.sales, "sales")
    }

    async fn close_cash(&self, request: &CashCloseRequest) -> ClientResult<()> {
        self.record(Call::CloseCash(request.clone()));
        pop(&self.closes, "close")
    }

    async fn report(&self, format: ReportFormat, range: DateRange) -> ClientResult<Vec<u8>> {
        self.record(Call::Report(format, range));
        pop(&self.reports, "report")
    }

    async fn verify_payment(&self, attention_number: &str) -> ClientResult<PaymentVerification> {
        // Only the HTTP binding is exercised for this endpoint
        self.record(Call::Verify(attention_number.to_string()));
        Err(ClientError::InvalidResponse("no scripted verification".into()))
    }
}
