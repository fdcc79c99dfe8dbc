use crate::domain::credentials::Credentials;
use crate::domain::payment::{Amount, PaymentMethod, PaymentOutcome};
use crate::error::{PaymentError, Result};
use crate::gateway::{build_http_client, missing_field, ChargeResult, GatewayClient};
use crate::settings::GatewaySettings;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

const METHOD: PaymentMethod = PaymentMethod::TokenizedCard;

/// Card-network tokenized adapter ("stripe"-style): the caller has already
/// exchanged raw card data for a single-use token, so this adapter never
/// sees card numbers at all. Charges carry a client reference the provider
/// also accepts in status lookups.
pub struct TokenizedCardGateway {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TokenChargeResponse {
    id: String,
    status: String,
}

impl TokenizedCardGateway {
    pub fn from_settings(settings: &GatewaySettings) -> Result<Self> {
        let http = build_http_client(METHOD, settings)?;
        Ok(Self {
            http,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    fn map_status(status: &str) -> PaymentOutcome {
        match status {
            "succeeded" => PaymentOutcome::Succeeded,
            "failed" => PaymentOutcome::Failed,
            _ => PaymentOutcome::Unknown,
        }
    }
}

#[async_trait]
impl GatewayClient for TokenizedCardGateway {
    fn method(&self) -> PaymentMethod {
        METHOD
    }

    fn validate(&self, credentials: &Credentials) -> Result<()> {
        let token = credentials
            .card_token
            .as_deref()
            .ok_or_else(|| missing_field(METHOD, "card_token"))?;
        if token.trim().is_empty() {
            return Err(PaymentError::InvalidCredentials {
                method: METHOD,
                reason: "card_token must not be empty".to_string(),
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
            "client_reference": reference,
            "amount": amount.value(),
            "source": credentials.card_token.as_deref().unwrap_or_default(),
        });

        let response = self
            .http
            .post(format!("{}/v1/charges", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await;

        match response {
            Ok(response) => match response.json::<TokenChargeResponse>().await {
                Ok(charge) => {
                    debug!(reference = %charge.id, status = %charge.status, "token charge answered");
                    ChargeResult::settled(charge.id, Self::map_status(&charge.status))
                }
                Err(err) => {
                    warn!(error = %err, "token charge response could not be decoded");
                    ChargeResult::unknown()
                }
            },
            Err(err) => {
                warn!(error = %err, timeout = err.is_timeout(), "token charge did not complete");
                ChargeResult::unknown()
            }
        }
    }

    async fn query_status(&self, gateway_reference: &str) -> Result<PaymentOutcome> {
        let charge: TokenChargeResponse = self
            .http
            .get(format!("{}/v1/charges/{gateway_reference}", self.endpoint))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|err| PaymentError::GatewayUnavailable(err.to_string()))?
            .error_for_status()
            .map_err(|err| PaymentError::GatewayUnavailable(err.to_string()))?
            .json()
            .await
            .map_err(|err| PaymentError::GatewayUnavailable(err.to_string()))?;

        Ok(Self::map_status(&charge.status))
    }
}
