//! Open order list (pedidos en caja)
//!
//! Read-only cached copy of `GET /cajero/pedidos`, replaced wholesale on
//! every refresh. Hook it to a [`PaymentWorkflow`](crate::PaymentWorkflow)
//! with [`OrderList::watch`] so it follows payments and kitchen forwards.

use std::sync::Arc;

use shared::models::{Order, OrderStatus};
use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;

use crate::ClientResult;
use crate::api::CajeroApi;
use crate::workflow::WorkflowEvent;

pub struct OrderList<A: CajeroApi> {
    api: Arc<A>,
    orders: RwLock<Vec<Order>>,
}

impl<A: CajeroApi + 'static> OrderList<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            orders: RwLock::new(Vec::new()),
        }
    }

    /// Re-fetch the list. On failure the previous copy is kept.
    pub async fn refresh(&self) -> ClientResult<usize> {
        match self.api.list_orders().await {
            Ok(fresh) => {
                let count = fresh.len();
                *self.orders.write().await = fresh;
                tracing::debug!(count, "Order list refreshed");
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Order list refresh failed, keeping cached copy");
                Err(e)
            }
        }
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.orders.read().await.clone()
    }

    /// Orders still waiting for payment
    pub async fn pending(&self) -> Vec<Order> {
        self.with_status(OrderStatus::Pending).await
    }

    pub async fn with_status(&self, status: OrderStatus) -> Vec<Order> {
        self.orders
            .read()
            .await
            .iter()
            .filter(|o| o.status == status)
            .cloned()
            .collect()
    }

    pub async fn find_by_number(&self, attention_number: &str) -> Option<Order> {
        let wanted = attention_number.trim();
        self.orders
            .read()
            .await
            .iter()
            .find(|o| o.attention_number == wanted)
            .cloned()
    }

    /// Refresh every time the workflow reports a changed order.
    ///
    /// The task ends when the workflow is dropped.
    pub fn watch(self: Arc<Self>, mut events: broadcast::Receiver<WorkflowEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(WorkflowEvent::OrdersChanged { order_id }) => {
                        tracing::debug!(order_id, "Order changed, refreshing list");
                        let _ = self.refresh().await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Order events lagged, refreshing list");
                        let _ = self.refresh().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
