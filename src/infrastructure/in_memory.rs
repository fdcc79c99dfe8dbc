use crate::domain::order::Order;
use crate::domain::payment::{Amount, Payment, PaymentMethod, PaymentOutcome};
use crate::domain::ports::{OrderStore, PaymentLedger};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory order repository.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn get(&self, order_id: Uuid) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&order_id).cloned())
    }

    async fn store(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id, order);
        Ok(())
    }
}

#[derive(Default)]
struct LedgerInner {
    payments: HashMap<Uuid, Payment>,
    // order id -> the payment currently blocking new attempts for it
    in_flight: HashMap<Uuid, Uuid>,
}

/// In-memory payment ledger.
///
/// Both maps live under one `RwLock` so `create_attempt` is a genuine
/// compare-and-insert and `complete_attempt` a single state transition;
/// two racing calls cannot both pass their precondition.
#[derive(Default, Clone)]
pub struct InMemoryPaymentLedger {
    inner: Arc<RwLock<LedgerInner>>,
}

impl InMemoryPaymentLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentLedger for InMemoryPaymentLedger {
    async fn create_attempt(
        &self,
        order: &Order,
        method: PaymentMethod,
        amount: Amount,
    ) -> Result<Payment> {
        let mut inner = self.inner.write().await;
        if inner.in_flight.contains_key(&order.id) {
            return Err(PaymentError::DuplicateInFlightAttempt { order_id: order.id });
        }
        let payment = Payment::initiated(order.id, method, amount);
        inner.in_flight.insert(order.id, payment.id);
        inner.payments.insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn complete_attempt(
        &self,
        payment_id: Uuid,
        gateway_reference: Option<String>,
        outcome: PaymentOutcome,
    ) -> Result<Payment> {
        let mut inner = self.inner.write().await;
        let payment = inner
            .payments
            .get_mut(&payment_id)
            .ok_or(PaymentError::PaymentNotFound)?;

        if payment.outcome.is_terminal() {
            return Err(PaymentError::AlreadyCompleted { payment_id });
        }

        if let Some(reference) = gateway_reference {
            payment.gateway_reference = Some(reference);
        }
        payment.outcome = outcome;
        payment.last_checked_at = Some(Utc::now());
        let payment = payment.clone();

        if outcome.is_terminal() {
            inner.in_flight.remove(&payment.order_id);
        }
        Ok(payment)
    }

    async fn get(&self, payment_id: Uuid) -> Result<Option<Payment>> {
        let inner = self.inner.read().await;
        Ok(inner.payments.get(&payment_id).cloned())
    }
}
