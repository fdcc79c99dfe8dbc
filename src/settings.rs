use crate::domain::payment::PaymentMethod;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

fn default_timeout_ms() -> u64 {
    5_000
}

/// Connection settings for one gateway adapter.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GatewaySettings {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl GatewaySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Per-method gateway configuration, read once at startup when the registry
/// is built.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub credit_card: GatewaySettings,
    #[serde(default)]
    pub paypal: GatewaySettings,
    #[serde(default)]
    pub bank_transfer: GatewaySettings,
    #[serde(default)]
    pub tokenized_card: GatewaySettings,
}

impl Settings {
    /// Loads settings from a TOML file, with `PAYGATE_`-prefixed environment
    /// variables taking precedence (e.g. `PAYGATE_CREDIT_CARD__API_KEY`).
    pub fn load(path: &Path) -> std::result::Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("PAYGATE_").split("__"))
            .extract()
    }

    pub fn gateway(&self, method: PaymentMethod) -> &GatewaySettings {
        match method {
            PaymentMethod::CreditCard => &self.credit_card,
            PaymentMethod::Paypal => &self.paypal,
            PaymentMethod::BankTransfer => &self.bank_transfer,
            PaymentMethod::TokenizedCard => &self.tokenized_card,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_toml() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[credit_card]").unwrap();
        writeln!(file, "endpoint = \"https://cards.example.com\"").unwrap();
        writeln!(file, "api_key = \"cc-key\"").unwrap();
        writeln!(file, "timeout_ms = 1500").unwrap();
        writeln!(file, "[paypal]").unwrap();
        writeln!(file, "endpoint = \"https://paypal.example.com\"").unwrap();
        writeln!(file, "api_key = \"pp-key\"").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.credit_card.endpoint, "https://cards.example.com");
        assert_eq!(settings.credit_card.timeout_ms, 1500);
        // Defaults apply where the file is silent.
        assert_eq!(settings.paypal.timeout_ms, 5000);
        assert_eq!(settings.bank_transfer.endpoint, "");
    }

    #[test]
    fn test_gateway_lookup_by_method() {
        let mut settings = Settings::default();
        settings.bank_transfer.endpoint = "https://bank.example.com".to_string();
        assert_eq!(
            settings.gateway(PaymentMethod::BankTransfer).endpoint,
            "https://bank.example.com"
        );
        assert_eq!(settings.gateway(PaymentMethod::Paypal).endpoint, "");
    }
}
