use crate::domain::credentials::Credentials;
use crate::domain::payment::{Amount, PaymentMethod, PaymentOutcome};
use crate::error::{PaymentError, Result};
use crate::gateway::{build_http_client, missing_field, ChargeResult, GatewayClient};
use crate::settings::GatewaySettings;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

const METHOD: PaymentMethod = PaymentMethod::Paypal;

/// PayPal-style adapter. A payment is keyed by the payer's email plus a
/// merchant invoice reference; the provider answers with a payment id and a
/// state, and status lookups resolve either identifier.
pub struct PayPalGateway {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct PayPalPaymentResponse {
    id: String,
    state: String,
}

impl PayPalGateway {
    pub fn from_settings(settings: &GatewaySettings) -> Result<Self> {
        let http = build_http_client(METHOD, settings)?;
        Ok(Self {
            http,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    fn map_state(state: &str) -> PaymentOutcome {
        match state {
            "completed" => PaymentOutcome::Succeeded,
            "denied" => PaymentOutcome::Failed,
            _ => PaymentOutcome::Unknown,
        }
    }
}

#[async_trait]
impl GatewayClient for PayPalGateway {
    fn method(&self) -> PaymentMethod {
        METHOD
    }

    fn validate(&self, credentials: &Credentials) -> Result<()> {
        let email = credentials
            .paypal_email
            .as_deref()
            .ok_or_else(|| missing_field(METHOD, "paypal_email"))?;
        // A full RFC check belongs to the provider; we only reject obvious junk.
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(PaymentError::InvalidCredentials {
                method: METHOD,
                reason: "paypal_email is not a valid email address".to_string(),
            });
        }
        Ok(())
    }

    async fn charge(
        &self,
        reference: &str,
        amount: Amount,
        credentials: &Credentials,
    ) -> ChargeResult {
        let body = serde_json::json!({
            "invoice_number": reference,
            "amount": amount.value(),
            "payer_email": credentials.paypal_email.as_deref().unwrap_or_default(),
        });

        let response = self
            .http
            .post(format!("{}/v1/payments", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await;

        match response {
            Ok(response) => match response.json::<PayPalPaymentResponse>().await {
                Ok(payment) => {
                    debug!(reference = %payment.id, state = %payment.state, "paypal payment answered");
                    ChargeResult::settled(payment.id, Self::map_state(&payment.state))
                }
                Err(err) => {
                    warn!(error = %err, "paypal payment response could not be decoded");
                    ChargeResult::unknown()
                }
            },
            Err(err) => {
                warn!(error = %err, timeout = err.is_timeout(), "paypal payment did not complete");
                ChargeResult::unknown()
            }
        }
    }

    async fn query_status(&self, gateway_reference: &str) -> Result<PaymentOutcome> {
        let payment: PayPalPaymentResponse = self
            .http
            .get(format!("{}/v1/payments/{gateway_reference}", self.endpoint))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|err| PaymentError::GatewayUnavailable(err.to_string()))?
            .error_for_status()
            .map_err(|err| PaymentError::GatewayUnavailable(err.to_string()))?
            .json()
            .await
            .map_err(|err| PaymentError::GatewayUnavailable(err.to_string()))?;

        Ok(Self::map_state(&payment.state))
    }
}
