use crate::domain::order::OrderStatus;
use crate::domain::payment::PaymentMethod;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, PaymentError>;

/// Every failure the engine can produce. Nothing here is fatal; all of these
/// are values returned to the caller for business-level handling.
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("unsupported payment method: {0}")]
    UnsupportedMethod(PaymentMethod),

    #[error("invalid credentials for {method}: {reason}")]
    InvalidCredentials {
        method: PaymentMethod,
        reason: String,
    },

    #[error("invalid gateway configuration for {method}: {reason}")]
    InvalidGatewayConfig {
        method: PaymentMethod,
        reason: String,
    },

    #[error("order is not eligible for payment (status: {status})")]
    IneligibleOrderState { status: OrderStatus },

    #[error("no order transition defined from {from}")]
    InvalidTransition { from: OrderStatus },

    #[error("order {order_id} already has an in-flight payment attempt")]
    DuplicateInFlightAttempt { order_id: Uuid },

    #[error("payment {payment_id} is already completed")]
    AlreadyCompleted { payment_id: Uuid },

    #[error("payment {payment_id} cannot be reconciled")]
    NotReconcilable { payment_id: Uuid },

    #[error("gateway unavailable: {0}")]
    GatewayUnavailable(String),

    #[error("order not found")]
    OrderNotFound,

    #[error("payment not found")]
    PaymentNotFound,

    #[error("amount must be positive")]
    InvalidAmount,
}
