use crate::domain::credentials::Credentials;
use crate::domain::payment::{Amount, PaymentMethod, PaymentOutcome};
use crate::error::{PaymentError, Result};
use crate::gateway::{build_http_client, missing_field, ChargeResult, GatewayClient};
use crate::settings::GatewaySettings;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

const METHOD: PaymentMethod = PaymentMethod::CreditCard;

/// Adapter for the card processor.
///
/// Charges are posted to `/charges` with a merchant reference; the processor
/// answers with a transaction id and a status string, and indexes the charge
/// under both, so `/charges/{id}` resolves either one. Anything that is
/// neither an approval nor a decline (e.g. a manual-review state) is treated
/// as not yet known.
pub struct CreditCardGateway {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct CardChargeResponse {
    transaction_id: String,
    status: String,
}

impl CreditCardGateway {
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
            "approved" => PaymentOutcome::Succeeded,
            "declined" => PaymentOutcome::Failed,
            _ => PaymentOutcome::Unknown,
        }
    }
}

#[async_trait]
impl GatewayClient for CreditCardGateway {
    fn method(&self) -> PaymentMethod {
        METHOD
    }

    fn validate(&self, credentials: &Credentials) -> Result<()> {
        let number = credentials
            .card_number
            .as_deref()
            .ok_or_else(|| missing_field(METHOD, "card_number"))?;
        if number.len() < 12 || number.len() > 19 || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(PaymentError::InvalidCredentials {
                method: METHOD,
                reason: "card_number must be 12-19 digits".to_string(),
            });
        }

        let month = credentials
            .card_expiry_month
            .as_deref()
            .ok_or_else(|| missing_field(METHOD, "card_expiry_month"))?;
        if !matches!(month.parse::<u8>(), Ok(1..=12)) {
            return Err(PaymentError::InvalidCredentials {
                method: METHOD,
                reason: "card_expiry_month must be 1-12".to_string(),
            });
        }

        let year = credentials
            .card_expiry_year
            .as_deref()
            .ok_or_else(|| missing_field(METHOD, "card_expiry_year"))?;
        if year.len() != 4 || year.parse::<u16>().is_err() {
            return Err(PaymentError::InvalidCredentials {
                method: METHOD,
                reason: "card_expiry_year must be a four digit year".to_string(),
            });
        }

        let cvv = credentials
            .card_cvv
            .as_deref()
            .ok_or_else(|| missing_field(METHOD, "card_cvv"))?;
        if cvv.len() < 3 || cvv.len() > 4 || !cvv.chars().all(|c| c.is_ascii_digit()) {
            return Err(PaymentError::InvalidCredentials {
                method: METHOD,
                reason: "card_cvv must be 3-4 digits".to_string(),
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
            "reference": reference,
            "amount": amount.value(),
            "card_number": credentials.card_number.as_deref().unwrap_or_default(),
            "expiry_month": credentials.card_expiry_month.as_deref().unwrap_or_default(),
            "expiry_year": credentials.card_expiry_year.as_deref().unwrap_or_default(),
            "cvv": credentials.card_cvv.as_deref().unwrap_or_default(),
        });

        let response = self
            .http
            .post(format!("{}/charges", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await;

        match response {
            Ok(response) => match response.json::<CardChargeResponse>().await {
                Ok(charge) => {
                    debug!(reference = %charge.transaction_id, status = %charge.status, "card charge answered");
                    ChargeResult::settled(charge.transaction_id, Self::map_status(&charge.status))
                }
                Err(err) => {
                    warn!(error = %err, "card charge response could not be decoded");
                    ChargeResult::unknown()
                }
            },
            Err(err) => {
                warn!(error = %err, timeout = err.is_timeout(), "card charge did not complete");
                ChargeResult::unknown()
            }
        }
    }

    async fn query_status(&self, gateway_reference: &str) -> Result<PaymentOutcome> {
        let charge: CardChargeResponse = self
            .http
            .get(format!("{}/charges/{gateway_reference}", self.endpoint))
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
