use serde::Deserialize;
use std::fmt;

/// Method-specific credentials as supplied by the caller.
///
/// A flat bag of optional fields mirroring the payment request payload; each
/// gateway adapter picks out and validates the fields its method requires.
/// Credentials are pass-through: they are handed to the gateway for a single
/// call and never persisted, which is why this type is not `Serialize` and
/// its `Debug` output is redacted.
#[derive(Default, Clone, Deserialize)]
pub struct Credentials {
    pub card_number: Option<String>,
    pub card_expiry_month: Option<String>,
    pub card_expiry_year: Option<String>,
    pub card_cvv: Option<String>,
    pub paypal_email: Option<String>,
    pub account_number: Option<String>,
    pub card_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(field: &Option<String>) -> &'static str {
            if field.is_some() { "[redacted]" } else { "None" }
        }
        f.debug_struct("Credentials")
            .field("card_number", &redact(&self.card_number))
            .field("card_expiry_month", &redact(&self.card_expiry_month))
            .field("card_expiry_year", &redact(&self.card_expiry_year))
            .field("card_cvv", &redact(&self.card_cvv))
            .field("paypal_email", &redact(&self.paypal_email))
            .field("account_number", &redact(&self.account_number))
            .field("card_token", &redact(&self.card_token))
            .finish()
    }
}
