use crate::domain::credentials::Credentials;
use crate::domain::order::OrderStatus;
use crate::domain::payment::{Payment, PaymentMethod, PaymentOutcome};
use crate::domain::ports::{OrderStoreBox, PaymentLedgerBox};
use crate::error::{PaymentError, Result};
use crate::gateway::GatewayRegistry;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A request to charge an order. Deliberately carries no amount: the amount
/// is always derived from the order itself.
#[derive(Debug)]
pub struct PaymentRequest {
    pub method: PaymentMethod,
    pub credentials: Credentials,
}

/// The engine's entry point.
///
/// A stateless coordinator over the gateway registry and the ledger: every
/// `process`/`reconcile` call runs as an independent unit of work, and all
/// cross-call guarantees (one in-flight attempt per order, exactly-once
/// completion) come from the ledger, not from anything held here.
pub struct PaymentOrchestrator {
    registry: Arc<GatewayRegistry>,
    orders: OrderStoreBox,
    ledger: PaymentLedgerBox,
}

impl PaymentOrchestrator {
    pub fn new(registry: Arc<GatewayRegistry>, orders: OrderStoreBox, ledger: PaymentLedgerBox) -> Self {
        Self {
            registry,
            orders,
            ledger,
        }
    }

    /// Executes one payment attempt against an order.
    ///
    /// Caller-input problems (unsupported method, bad credentials) and state
    /// conflicts (ineligible order, in-flight attempt) are reported before
    /// any gateway traffic. The attempt record is created before the charge
    /// so a crash mid-call still leaves a trace, and a transport failure is
    /// recorded as an `Unknown` outcome instead of surfacing as an error.
    /// There is no retry here: retrying a payment API blindly risks a double
    /// charge, so retries happen through `reconcile` only.
    pub async fn process(&self, order_id: Uuid, request: PaymentRequest) -> Result<Payment> {
        let mut order = self
            .orders
            .get(order_id)
            .await?
            .ok_or(PaymentError::OrderNotFound)?;
        order.check_eligible()?;

        let gateway = self.registry.resolve(request.method)?;
        gateway.validate(&request.credentials)?;

        let payment = self
            .ledger
            .create_attempt(&order, request.method, order.total)
            .await?;
        info!(
            payment_id = %payment.id,
            order_id = %order.id,
            method = %request.method,
            amount = %payment.amount,
            "charging gateway"
        );

        // The attempt id doubles as the merchant reference on the charge,
        // so the gateway can be asked about it even if the response is lost.
        let charge = gateway
            .charge(&payment.id.to_string(), order.total, &request.credentials)
            .await;
        let payment = self
            .ledger
            .complete_attempt(payment.id, charge.gateway_reference, charge.outcome)
            .await?;

        order.advance(charge.outcome)?;
        if order.status == OrderStatus::Paid {
            self.orders.store(order).await?;
        }

        info!(payment_id = %payment.id, outcome = %payment.outcome, "attempt recorded");
        Ok(payment)
    }

    /// Settles an ambiguous attempt with the gateway's authoritative answer.
    ///
    /// Valid only while the stored outcome is non-terminal; anything else is
    /// `NotReconcilable`. Safe to call repeatedly: once a terminal outcome
    /// lands, later calls are rejected, and of two concurrent completions
    /// the ledger lets exactly one through.
    pub async fn reconcile(&self, payment_id: Uuid) -> Result<Payment> {
        let payment = self
            .ledger
            .get(payment_id)
            .await?
            .ok_or(PaymentError::PaymentNotFound)?;
        if payment.outcome.is_terminal() {
            return Err(PaymentError::NotReconcilable { payment_id });
        }
        // When the charge response never arrived there is no provider id on
        // record; the merchant reference (the attempt id) was still sent
        // with the charge, so query by that instead.
        let reference = payment
            .gateway_reference
            .clone()
            .unwrap_or_else(|| payment.id.to_string());

        let gateway = self.registry.resolve(payment.method)?;
        let outcome = gateway.query_status(&reference).await?;
        debug!(payment_id = %payment.id, outcome = %outcome, "gateway answered status query");

        let payment = self.ledger.complete_attempt(payment.id, None, outcome).await?;

        if outcome == PaymentOutcome::Succeeded {
            if let Some(mut order) = self.orders.get(payment.order_id).await? {
                if order.status == OrderStatus::Confirmed {
                    order.advance(outcome)?;
                    self.orders.store(order).await?;
                } else {
                    warn!(
                        order_id = %order.id,
                        status = %order.status,
                        "reconciled a payment for an order that is no longer confirmed"
                    );
                }
            }
        }

        Ok(payment)
    }
}
