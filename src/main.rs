use clap::Parser;
use miette::{IntoDiagnostic, Result};
use paygate::application::orchestrator::{PaymentOrchestrator, PaymentRequest};
use paygate::domain::credentials::Credentials;
use paygate::domain::order::{Order, OrderStatus};
use paygate::domain::payment::{Amount, PaymentMethod};
use paygate::domain::ports::OrderStore;
use paygate::gateway::GatewayRegistry;
use paygate::infrastructure::in_memory::{InMemoryOrderStore, InMemoryPaymentLedger};
use paygate::settings::Settings;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Smoke-test CLI: seeds one confirmed order and runs a single payment
/// attempt against the configured gateways, printing the recorded payment.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Gateway configuration TOML file
    #[arg(long)]
    config: PathBuf,

    /// Order total to charge
    #[arg(long)]
    total: Decimal,

    /// Payment method (credit_card, paypal, bank_transfer, tokenized_card)
    #[arg(long)]
    method: PaymentMethod,

    #[arg(long)]
    card_number: Option<String>,
    #[arg(long)]
    card_expiry_month: Option<String>,
    #[arg(long)]
    card_expiry_year: Option<String>,
    #[arg(long)]
    card_cvv: Option<String>,
    #[arg(long)]
    paypal_email: Option<String>,
    #[arg(long)]
    account_number: Option<String>,
    #[arg(long)]
    card_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let settings = Settings::load(&cli.config).into_diagnostic()?;
    let registry = GatewayRegistry::from_settings(&settings).into_diagnostic()?;

    let orders = InMemoryOrderStore::new();
    let total = Amount::new(cli.total).into_diagnostic()?;
    let order = Order::new(Uuid::new_v4(), total, OrderStatus::Confirmed);
    orders.store(order.clone()).await.into_diagnostic()?;

    let orchestrator = PaymentOrchestrator::new(
        Arc::new(registry),
        Box::new(orders),
        Box::new(InMemoryPaymentLedger::new()),
    );

    let request = PaymentRequest {
        method: cli.method,
        credentials: Credentials {
            card_number: cli.card_number,
            card_expiry_month: cli.card_expiry_month,
            card_expiry_year: cli.card_expiry_year,
            card_cvv: cli.card_cvv,
            paypal_email: cli.paypal_email,
            account_number: cli.account_number,
            card_token: cli.card_token,
        },
    };

    let payment = orchestrator.process(order.id, request).await.into_diagnostic()?;
    println!("{}", serde_json::to_string_pretty(&payment).into_diagnostic()?);

    Ok(())
}
