use crate::domain::order::Order;
use crate::domain::payment::{Amount, Payment, PaymentMethod, PaymentOutcome};
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

pub type OrderStoreBox = Box<dyn OrderStore>;
pub type PaymentLedgerBox = Box<dyn PaymentLedger>;

/// Repository for orders. The surrounding service owns order creation and
/// authorization; the engine only loads orders and writes back status
/// transitions.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get(&self, order_id: Uuid) -> Result<Option<Order>>;
    async fn store(&self, order: Order) -> Result<()>;
}

/// Durable record of payment attempts, and the single source of truth for
/// the "at most one in-flight attempt per order" invariant.
#[async_trait]
pub trait PaymentLedger: Send + Sync {
    /// Allocates a new attempt in `Initiated` state.
    ///
    /// Must be an atomic compare-and-insert against the order's current
    /// in-flight attempt: if one exists, fails with
    /// `DuplicateInFlightAttempt` instead of queueing. The orchestrator holds
    /// no lock of its own and relies entirely on this guarantee.
    async fn create_attempt(
        &self,
        order: &Order,
        method: PaymentMethod,
        amount: Amount,
    ) -> Result<Payment>;

    /// Records the outcome of an attempt as a single atomic transition.
    ///
    /// Allowed from `Initiated` and from `Unknown` (reconciliation may
    /// re-settle an ambiguous attempt); fails with `AlreadyCompleted` once a
    /// terminal outcome is recorded, so of two racing completions exactly one
    /// wins. A terminal outcome releases the order's in-flight slot. The
    /// gateway reference is only written when one is supplied, and
    /// `last_checked_at` is stamped on every call.
    async fn complete_attempt(
        &self,
        payment_id: Uuid,
        gateway_reference: Option<String>,
        outcome: PaymentOutcome,
    ) -> Result<Payment>;

    async fn get(&self, payment_id: Uuid) -> Result<Option<Payment>>;
}
