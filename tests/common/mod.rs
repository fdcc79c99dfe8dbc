use async_trait::async_trait;
use paygate::application::orchestrator::PaymentOrchestrator;
use paygate::domain::credentials::Credentials;
use paygate::domain::order::{Order, OrderStatus};
use paygate::domain::payment::{Amount, PaymentMethod, PaymentOutcome};
use paygate::domain::ports::OrderStore;
use paygate::error::{PaymentError, Result};
use paygate::gateway::{ChargeResult, GatewayClient, GatewayRegistry};
use paygate::infrastructure::in_memory::{InMemoryOrderStore, InMemoryPaymentLedger};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// A gateway whose answers are scripted by the test. Counts calls so tests
/// can assert the gateway was (or was not) reached.
pub struct ScriptedGateway {
    method: PaymentMethod,
    charge_result: Mutex<ChargeResult>,
    status_result: Mutex<Result<PaymentOutcome>>,
    charge_delay: Option<Duration>,
    pub charges: AtomicUsize,
    pub status_queries: AtomicUsize,
    pub queried_references: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    /// A gateway that approves every charge.
    pub fn succeeding(method: PaymentMethod) -> Self {
        Self {
            method,
            charge_result: Mutex::new(ChargeResult::settled(
                "mock-ref-1".to_string(),
                PaymentOutcome::Succeeded,
            )),
            status_result: Mutex::new(Ok(PaymentOutcome::Succeeded)),
            charge_delay: None,
            charges: AtomicUsize::new(0),
            status_queries: AtomicUsize::new(0),
            queried_references: Mutex::new(Vec::new()),
        }
    }

    pub fn charge_returns(self, result: ChargeResult) -> Self {
        *self.charge_result.lock().unwrap() = result;
        self
    }

    pub fn status_returns(self, result: Result<PaymentOutcome>) -> Self {
        *self.status_result.lock().unwrap() = result;
        self
    }

    pub fn with_charge_delay(mut self, delay: Duration) -> Self {
        self.charge_delay = Some(delay);
        self
    }

    /// Re-scripts the charge answer mid-test (e.g. fail first, then approve).
    pub fn set_charge(&self, result: ChargeResult) {
        *self.charge_result.lock().unwrap() = result;
    }

    pub fn set_status(&self, result: Result<PaymentOutcome>) {
        *self.status_result.lock().unwrap() = result;
    }

    fn clone_status(&self) -> Result<PaymentOutcome> {
        match &*self.status_result.lock().unwrap() {
            Ok(outcome) => Ok(*outcome),
            Err(PaymentError::GatewayUnavailable(reason)) => {
                Err(PaymentError::GatewayUnavailable(reason.clone()))
            }
            Err(_) => Err(PaymentError::GatewayUnavailable("scripted".to_string())),
        }
    }
}

#[async_trait]
impl GatewayClient for ScriptedGateway {
    fn method(&self) -> PaymentMethod {
        self.method
    }

    fn validate(&self, credentials: &Credentials) -> Result<()> {
        let (field, value) = match self.method {
            PaymentMethod::CreditCard => ("card_number", &credentials.card_number),
            PaymentMethod::Paypal => ("paypal_email", &credentials.paypal_email),
            PaymentMethod::BankTransfer => ("account_number", &credentials.account_number),
            PaymentMethod::TokenizedCard => ("card_token", &credentials.card_token),
        };
        if value.is_none() {
            return Err(PaymentError::InvalidCredentials {
                method: self.method,
                reason: format!("{field} is required"),
            });
        }
        Ok(())
    }

    async fn charge(
        &self,
        _reference: &str,
        _amount: Amount,
        _credentials: &Credentials,
    ) -> ChargeResult {
        if let Some(delay) = self.charge_delay {
            tokio::time::sleep(delay).await;
        }
        self.charges.fetch_add(1, Ordering::SeqCst);
        self.charge_result.lock().unwrap().clone()
    }

    async fn query_status(&self, gateway_reference: &str) -> Result<PaymentOutcome> {
        self.status_queries.fetch_add(1, Ordering::SeqCst);
        self.queried_references
            .lock()
            .unwrap()
            .push(gateway_reference.to_string());
        self.clone_status()
    }
}

pub struct Harness {
    pub orchestrator: Arc<PaymentOrchestrator>,
    pub orders: InMemoryOrderStore,
    pub ledger: InMemoryPaymentLedger,
    pub gateway: Arc<ScriptedGateway>,
}

pub fn harness(gateway: ScriptedGateway) -> Harness {
    let gateway = Arc::new(gateway);
    let registry = GatewayRegistry::builder()
        .register(gateway.clone() as Arc<dyn GatewayClient>)
        .build();
    let orders = InMemoryOrderStore::new();
    let ledger = InMemoryPaymentLedger::new();
    let orchestrator = PaymentOrchestrator::new(
        Arc::new(registry),
        Box::new(orders.clone()),
        Box::new(ledger.clone()),
    );
    Harness {
        orchestrator: Arc::new(orchestrator),
        orders,
        ledger,
        gateway,
    }
}

pub async fn seed_order(orders: &InMemoryOrderStore, total: Decimal, status: OrderStatus) -> Order {
    let order = Order::new(Uuid::new_v4(), Amount::new(total).unwrap(), status);
    orders.store(order.clone()).await.unwrap();
    order
}

pub fn valid_credentials(method: PaymentMethod) -> Credentials {
    match method {
        PaymentMethod::CreditCard => Credentials {
            card_number: Some("4242424242424242".to_string()),
            card_expiry_month: Some("12".to_string()),
            card_expiry_year: Some("2030".to_string()),
            card_cvv: Some("123".to_string()),
            ..Default::default()
        },
        PaymentMethod::Paypal => Credentials {
            paypal_email: Some("buyer@example.com".to_string()),
            ..Default::default()
        },
        PaymentMethod::BankTransfer => Credentials {
            account_number: Some("00123456789".to_string()),
            ..Default::default()
        },
        PaymentMethod::TokenizedCard => Credentials {
            card_token: Some("tok_visa_4242".to_string()),
            ..Default::default()
        },
    }
}
