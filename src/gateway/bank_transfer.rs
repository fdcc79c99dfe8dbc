use crate::domain::credentials::Credentials;
use crate::domain::payment::{Amount, PaymentMethod, PaymentOutcome};
use crate::error::{PaymentError, Result};
use crate::gateway::{build_http_client, missing_field, ChargeResult, GatewayClient};
use crate::settings::GatewaySettings;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

const METHOD: PaymentMethod = PaymentMethod::BankTransfer;

/// Bank transfer adapter. Transfers carry an end-to-end reference and
/// usually sit in an `accepted`-but-pending state at the bank for a while,
/// so `Unknown` outcomes are the norm here and reconciliation does most of
/// the settling; `/transfers/{id}` resolves the bank's reference or the
/// end-to-end one.
pub struct BankTransferGateway {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TransferResponse {
    reference: String,
    status: String,
}

impl BankTransferGateway {
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
            "settled" => PaymentOutcome::Succeeded,
            "rejected" => PaymentOutcome::Failed,
            _ => PaymentOutcome::Unknown,
        }
    }
}

#[async_trait]
impl GatewayClient for BankTransferGateway {
    fn method(&self) -> PaymentMethod {
        METHOD
    }

    fn validate(&self, credentials: &Credentials) -> Result<()> {
        let account = credentials
            .account_number
            .as_deref()
            .ok_or_else(|| missing_field(METHOD, "account_number"))?;
        if account.is_empty() || !account.chars().all(|c| c.is_ascii_digit()) {
            return Err(PaymentError::InvalidCredentials {
                method: METHOD,
                reason: "account_number must be numeric".to_string(),
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
            "end_to_end_reference": reference,
            "amount": amount.value(),
            "account_number": credentials.account_number.as_deref().unwrap_or_default(),
        });

        let response = self
            .http
            .post(format!("{}/transfers", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await;

        match response {
            Ok(response) => match response.json::<TransferResponse>().await {
                Ok(transfer) => {
                    debug!(reference = %transfer.reference, status = %transfer.status, "transfer answered");
                    ChargeResult::settled(transfer.reference, Self::map_status(&transfer.status))
                }
                Err(err) => {
                    warn!(error = %err, "transfer response could not be decoded");
                    ChargeResult::unknown()
                }
            },
            Err(err) => {
                warn!(error = %err, timeout = err.is_timeout(), "transfer did not complete");
                ChargeResult::unknown()
            }
        }
    }

    async fn query_status(&self, gateway_reference: &str) -> Result<PaymentOutcome> {
        let transfer: TransferResponse = self
            .http
            .get(format!("{}/transfers/{gateway_reference}", self.endpoint))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|err| PaymentError::GatewayUnavailable(err.to_string()))?
            .error_for_status()
            .map_err(|err| PaymentError::GatewayUnavailable(err.to_string()))?
            .json()
            .await
            .map_err(|err| PaymentError::GatewayUnavailable(err.to_string()))?;

        Ok(Self::map_status(&transfer.status))
    }
}
