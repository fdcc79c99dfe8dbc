use crate::domain::payment::PaymentMethod;
use crate::error::{PaymentError, Result};
use crate::gateway::bank_transfer::BankTransferGateway;
use crate::gateway::credit_card::CreditCardGateway;
use crate::gateway::paypal::PayPalGateway;
use crate::gateway::tokenized_card::TokenizedCardGateway;
use crate::gateway::GatewayClient;
use crate::settings::Settings;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Maps payment methods to gateway clients.
///
/// Populated once at startup and immutable afterwards, so it can be shared
/// freely (`Arc<GatewayRegistry>`) across concurrent calls. Adapter
/// construction validates each gateway's configuration up front; `resolve`
/// itself is a cheap, side-effect-free lookup.
pub struct GatewayRegistry {
    gateways: HashMap<PaymentMethod, Arc<dyn GatewayClient>>,
}

impl GatewayRegistry {
    pub fn builder() -> GatewayRegistryBuilder {
        GatewayRegistryBuilder {
            gateways: HashMap::new(),
        }
    }

    /// Wires all four adapters from configuration. Fails on the first
    /// gateway whose configuration is unusable.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let registry = Self::builder()
            .register(Arc::new(CreditCardGateway::from_settings(
                settings.gateway(PaymentMethod::CreditCard),
            )?))
            .register(Arc::new(PayPalGateway::from_settings(
                settings.gateway(PaymentMethod::Paypal),
            )?))
            .register(Arc::new(BankTransferGateway::from_settings(
                settings.gateway(PaymentMethod::BankTransfer),
            )?))
            .register(Arc::new(TokenizedCardGateway::from_settings(
                settings.gateway(PaymentMethod::TokenizedCard),
            )?))
            .build();
        info!(gateways = registry.gateways.len(), "gateway registry initialized");
        Ok(registry)
    }

    pub fn resolve(&self, method: PaymentMethod) -> Result<Arc<dyn GatewayClient>> {
        self.gateways
            .get(&method)
            .cloned()
            .ok_or(PaymentError::UnsupportedMethod(method))
    }
}

/// Registration phase of the registry. Consumed by `build`; no registration
/// is possible afterwards.
pub struct GatewayRegistryBuilder {
    gateways: HashMap<PaymentMethod, Arc<dyn GatewayClient>>,
}

impl GatewayRegistryBuilder {
    pub fn register(mut self, gateway: Arc<dyn GatewayClient>) -> Self {
        self.gateways.insert(gateway.method(), gateway);
        self
    }

    pub fn build(self) -> GatewayRegistry {
        GatewayRegistry {
            gateways: self.gateways,
        }
    }
}
