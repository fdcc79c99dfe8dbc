//! Gateway adapters: one client per payment method, plus the registry that
//! maps method identifiers to clients.

pub mod bank_transfer;
pub mod credit_card;
pub mod paypal;
pub mod registry;
pub mod tokenized_card;

use crate::domain::credentials::Credentials;
use crate::domain::payment::{Amount, PaymentMethod, PaymentOutcome};
use crate::error::{PaymentError, Result};
use crate::settings::GatewaySettings;
use async_trait::async_trait;

pub use registry::GatewayRegistry;

/// What a single charge call produced.
///
/// `unknown()` is the shape for transport-level failures: no provider id, no
/// verdict. Callers must never map it to a terminal state; the merchant
/// reference sent with the charge still allows a later status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeResult {
    pub gateway_reference: Option<String>,
    pub outcome: PaymentOutcome,
}

impl ChargeResult {
    pub fn settled(gateway_reference: String, outcome: PaymentOutcome) -> Self {
        Self {
            gateway_reference: Some(gateway_reference),
            outcome,
        }
    }

    pub fn unknown() -> Self {
        Self {
            gateway_reference: None,
            outcome: PaymentOutcome::Unknown,
        }
    }
}

/// One external payment provider.
///
/// Adapters are stateless beyond their own endpoint/credential configuration
/// and are safe to share across concurrent calls.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    fn method(&self) -> PaymentMethod;

    /// Fails fast with `InvalidCredentials` before any network traffic when
    /// the method's required fields are missing or malformed.
    fn validate(&self, credentials: &Credentials) -> Result<()>;

    /// Executes one charge. `reference` is the caller-generated merchant
    /// reference (the attempt id); it is sent with the request so the charge
    /// stays queryable even when the response never arrives. Transport
    /// failures (timeout, connection reset, undecodable response) are folded
    /// into an `Unknown` outcome rather than returned as errors, so every
    /// attempted charge can be recorded. Never retries.
    async fn charge(
        &self,
        reference: &str,
        amount: Amount,
        credentials: &Credentials,
    ) -> ChargeResult;

    /// Read-only, idempotent status lookup. Accepts either the provider's
    /// own id or the merchant reference sent with the charge. Used by
    /// reconciliation only.
    async fn query_status(&self, gateway_reference: &str) -> Result<PaymentOutcome>;
}

/// Builds the adapter's HTTP client with the per-gateway timeout applied.
pub(crate) fn build_http_client(
    method: PaymentMethod,
    settings: &GatewaySettings,
) -> Result<reqwest::Client> {
    if settings.endpoint.is_empty() {
        return Err(PaymentError::InvalidGatewayConfig {
            method,
            reason: "endpoint is not configured".to_string(),
        });
    }
    if settings.api_key.is_empty() {
        return Err(PaymentError::InvalidGatewayConfig {
            method,
            reason: "api_key is not configured".to_string(),
        });
    }
    reqwest::Client::builder()
        .timeout(settings.timeout())
        .build()
        .map_err(|err| PaymentError::InvalidGatewayConfig {
            method,
            reason: err.to_string(),
        })
}

pub(crate) fn missing_field(method: PaymentMethod, field: &str) -> PaymentError {
    PaymentError::InvalidCredentials {
        method,
        reason: format!("{field} is required"),
    }
}
