//! Payment workflow controller

use std::sync::{Arc, Mutex, MutexGuard};

use shared::models::{Order, PaymentMethod, QrCode};
use tokio::sync::broadcast;

use super::error::WorkflowError;
use super::state::{PaymentAttempt, WorkflowEvent, WorkflowState};
use crate::ClientError;
use crate::api::CajeroApi;

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Default)]
struct Inner {
    state: WorkflowState,
    attempt: PaymentAttempt,
    qr: Option<QrCode>,
    busy: bool,
    /// Bumped by `reset()`; results of requests started under an older
    /// epoch are dropped.
    epoch: u64,
}

impl Inner {
    fn clear(&mut self) {
        self.state = WorkflowState::Idle;
        self.attempt = PaymentAttempt::default();
        self.qr = None;
        self.busy = false;
    }
}

/// What a cancelled request puts back
#[derive(Debug)]
struct Restore {
    state: WorkflowState,
    attempt: PaymentAttempt,
    qr: Option<QrCode>,
}

impl Restore {
    fn cleared() -> Self {
        Self {
            state: WorkflowState::Idle,
            attempt: PaymentAttempt::default(),
            qr: None,
        }
    }
}

/// Marks one request of the controller as in flight.
///
/// Dropping it without `complete` (the caller's future was cancelled)
/// puts back what was captured at start and frees the controller.
struct InFlight<'a> {
    inner: &'a Mutex<Inner>,
    epoch: u64,
    restore: Option<Restore>,
    done: bool,
}

impl InFlight<'_> {
    /// Apply the outcome unless a reset happened meanwhile.
    fn complete(mut self, apply: impl FnOnce(&mut Inner)) -> Result<(), WorkflowError> {
        self.done = true;
        let mut inner = lock(self.inner);
        if inner.epoch != self.epoch {
            return Err(WorkflowError::Discarded);
        }
        apply(&mut *inner);
        inner.busy = false;
        Ok(())
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        let mut inner = lock(self.inner);
        if inner.epoch == self.epoch {
            if let Some(restore) = self.restore.take() {
                inner.state = restore.state;
                inner.attempt = restore.attempt;
                inner.qr = restore.qr;
            }
            inner.busy = false;
            tracing::debug!("In-flight workflow request dropped, state restored");
        }
    }
}

fn lock(mutex: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    // State is plain data; a panic elsewhere cannot leave it half-written
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Drives one payment attempt at a time against the backend.
///
/// All methods take `&self` so a UI can share the controller (`Arc`)
/// between event handlers. At most one request is in flight per
/// controller; anything requested meanwhile fails with
/// [`WorkflowError::Busy`] instead of queueing.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use cajero_client::{ClientConfig, PaymentWorkflow};
/// use shared::models::PaymentMethod;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let api = Arc::new(ClientConfig::from_env().build_api()?);
/// let workflow = PaymentWorkflow::new(api);
///
/// let order = workflow.search("ABC123", PaymentMethod::Qr).await?;
/// workflow.commit().await?;
/// workflow.forward_to_preparation(order.id).await?;
/// # Ok(())
/// # }
/// ```
pub struct PaymentWorkflow<A: CajeroApi> {
    api: Arc<A>,
    inner: Mutex<Inner>,
    events: broadcast::Sender<WorkflowEvent>,
}

impl<A: CajeroApi> PaymentWorkflow<A> {
    pub fn new(api: Arc<A>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            api,
            inner: Mutex::new(Inner::default()),
            events,
        }
    }

    // ========== State access ==========

    pub fn state(&self) -> WorkflowState {
        lock(&self.inner).state.clone()
    }

    /// Code and method of the current attempt
    pub fn attempt(&self) -> PaymentAttempt {
        lock(&self.inner).attempt.clone()
    }

    /// Last QR payload generated for the current order
    pub fn qr(&self) -> Option<QrCode> {
        lock(&self.inner).qr.clone()
    }

    pub fn is_busy(&self) -> bool {
        lock(&self.inner).busy
    }

    /// Receive a [`WorkflowEvent`] every time an order changed server-side
    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.events.subscribe()
    }

    fn start<T>(
        &self,
        op: &'static str,
        prepare: impl FnOnce(&mut Inner) -> Result<(T, Option<Restore>), WorkflowError>,
    ) -> Result<(InFlight<'_>, T), WorkflowError> {
        let mut inner = lock(&self.inner);
        if inner.busy {
            tracing::warn!(op = op, state = inner.state.name(), "Workflow busy, request rejected");
            return Err(WorkflowError::Busy { op });
        }
        let (value, restore) = prepare(&mut *inner)?;
        inner.busy = true;
        let flight = InFlight {
            inner: &self.inner,
            epoch: inner.epoch,
            restore,
            done: false,
        };
        Ok((flight, value))
    }

    fn notify_changed(&self, order_id: i64) {
        // No subscribers is fine
        let _ = self.events.send(WorkflowEvent::OrdersChanged { order_id });
    }

    // ========== Operations ==========

    /// Look up the order behind `code` without paying it.
    ///
    /// Issues exactly one validate-only request. On success the workflow
    /// moves to `Found`; on any failure it is left `Idle` with no order.
    pub async fn search(&self, code: &str, method: PaymentMethod) -> Result<Order, WorkflowError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(WorkflowError::EmptyCode);
        }

        let (flight, ()) = self.start("search", |inner| {
            inner.attempt = PaymentAttempt {
                code: code.to_string(),
                method,
            };
            inner.qr = None;
            inner.state = WorkflowState::Searching;
            Ok(((), Some(Restore::cleared())))
        })?;

        tracing::info!(code = %code, method = %method, "Searching order for payment");
        let outcome = match self.api.validate_payment(code, method).await {
            Ok(v) if v.valido => v.pedido.ok_or_else(|| {
                WorkflowError::Client(ClientError::InvalidResponse(
                    "validation without pedido".into(),
                ))
            }),
            Ok(v) => Err(WorkflowError::Rejected(v.message)),
            Err(e) => Err(WorkflowError::Client(e)),
        };

        match outcome {
            Ok(order) => {
                let found = order.clone();
                flight.complete(|inner| inner.state = WorkflowState::Found(found))?;
                tracing::info!(
                    order_id = order.id,
                    attention_number = %order.attention_number,
                    "Order found"
                );
                Ok(order)
            }
            Err(err) => {
                flight.complete(|inner| inner.state = WorkflowState::Idle)?;
                tracing::warn!(code = %code, error = %err, "Order search failed");
                Err(err)
            }
        }
    }

    /// Pay the order found by the last `search`.
    ///
    /// Only valid in `Found`. On success the workflow is `Confirmed`, the
    /// attempt input is cleared (code `""`, method `EFECTIVO`) and an
    /// `OrdersChanged` event is published. On failure it stays `Found`.
    pub async fn commit(&self) -> Result<Order, WorkflowError> {
        let (flight, (attempt, order)) = self.start("commit", |inner| match &inner.state {
            WorkflowState::Found(order) => {
                let order = order.clone();
                inner.state = WorkflowState::Processing(order.clone());
                let restore = Restore {
                    state: WorkflowState::Found(order.clone()),
                    attempt: inner.attempt.clone(),
                    qr: inner.qr.clone(),
                };
                Ok(((inner.attempt.clone(), order), Some(restore)))
            }
            other => Err(WorkflowError::InvalidState {
                op: "commit",
                state: other.name(),
            }),
        })?;

        tracing::info!(order_id = order.id, method = %attempt.method, "Committing payment");
        let outcome = match self.api.commit_payment(&attempt.code, attempt.method).await {
            Ok(c) if c.success => Ok(c.pedido.unwrap_or_else(|| order.clone())),
            Ok(c) => Err(WorkflowError::Rejected(c.message)),
            Err(e) => Err(WorkflowError::Client(e)),
        };

        match outcome {
            Ok(paid) => {
                let confirmed = paid.clone();
                let applied = flight.complete(|inner| {
                    inner.state = WorkflowState::Confirmed(confirmed);
                    inner.attempt = PaymentAttempt::default();
                });
                // The backend took the payment even if a reset dropped the local result
                tracing::info!(
                    target: "audit",
                    order_id = paid.id,
                    attention_number = %paid.attention_number,
                    method = %attempt.method,
                    total = paid.total,
                    "Payment confirmed"
                );
                self.notify_changed(paid.id);
                applied?;
                Ok(paid)
            }
            Err(err) => {
                flight.complete(|inner| inner.state = WorkflowState::Found(order.clone()))?;
                tracing::warn!(order_id = order.id, error = %err, "Payment commit failed");
                Err(err)
            }
        }
    }

    /// Request the QR payload for the current order. Does not change state.
    pub async fn generate_qr(&self, order_id: i64) -> Result<QrCode, WorkflowError> {
        let (flight, ()) = self.start("generate_qr", |inner| {
            let current = match &inner.state {
                WorkflowState::Found(o) | WorkflowState::Confirmed(o) => o.id,
                other => {
                    return Err(WorkflowError::InvalidState {
                        op: "generate_qr",
                        state: other.name(),
                    });
                }
            };
            if current != order_id {
                return Err(WorkflowError::OrderMismatch {
                    expected: current,
                    got: order_id,
                });
            }
            Ok(((), None))
        })?;

        match self.api.generate_qr(order_id).await {
            Ok(qr) => {
                let stored = qr.clone();
                flight.complete(|inner| inner.qr = Some(stored))?;
                tracing::info!(order_id, attention_number = %qr.numero_atencion, "QR generated");
                Ok(qr)
            }
            Err(e) => {
                flight.complete(|_| {})?;
                tracing::warn!(order_id, error = %e, "QR generation failed");
                Err(e.into())
            }
        }
    }

    /// Send a confirmed order to the kitchen and start over.
    ///
    /// Only valid in `Confirmed`. On success the workflow is reset to
    /// `Idle` and one `OrdersChanged` event is published.
    pub async fn forward_to_preparation(&self, order_id: i64) -> Result<(), WorkflowError> {
        let (flight, ()) = self.start("forward_to_preparation", |inner| match &inner.state {
            WorkflowState::Confirmed(o) if o.id == order_id => Ok(((), None)),
            WorkflowState::Confirmed(o) => Err(WorkflowError::OrderMismatch {
                expected: o.id,
                got: order_id,
            }),
            other => Err(WorkflowError::InvalidState {
                op: "forward_to_preparation",
                state: other.name(),
            }),
        })?;

        match self.api.forward_to_preparation(order_id).await {
            Ok(()) => {
                let applied = flight.complete(Inner::clear);
                tracing::info!(order_id, "Order forwarded to preparation");
                self.notify_changed(order_id);
                applied
            }
            Err(e) => {
                flight.complete(|_| {})?;
                tracing::warn!(order_id, error = %e, "Forward to preparation failed");
                Err(e.into())
            }
        }
    }

    /// Back to `Idle`, discarding the attempt. Always available; a request
    /// still in flight has its result dropped.
    pub fn reset(&self) {
        let mut inner = lock(&self.inner);
        inner.epoch = inner.epoch.wrapping_add(1);
        inner.clear();
        tracing::debug!("Payment workflow reset");
    }
}
