use crate::error::{PaymentError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A positive monetary amount.
///
/// Wrapper around `rust_decimal::Decimal` so a zero or negative charge can
/// never be constructed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PaymentError::InvalidAmount)
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The closed set of payment methods the engine can route.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
    BankTransfer,
    TokenizedCard,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::CreditCard,
        PaymentMethod::Paypal,
        PaymentMethod::BankTransfer,
        PaymentMethod::TokenizedCard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::TokenizedCard => "tokenized_card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "credit_card" => Ok(PaymentMethod::CreditCard),
            "paypal" => Ok(PaymentMethod::Paypal),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            "tokenized_card" => Ok(PaymentMethod::TokenizedCard),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentOutcome {
    Initiated,
    Succeeded,
    Failed,
    Unknown,
}

impl PaymentOutcome {
    /// Succeeded and failed are final; initiated and unknown can still be
    /// settled by reconciliation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentOutcome::Succeeded | PaymentOutcome::Failed)
    }

    /// An attempt counts as in flight until a terminal outcome is recorded.
    /// That includes `Unknown`: a charge whose true result we do not know
    /// must not be raced by a second charge against the same order.
    pub fn is_in_flight(&self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for PaymentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentOutcome::Initiated => "initiated",
            PaymentOutcome::Succeeded => "succeeded",
            PaymentOutcome::Failed => "failed",
            PaymentOutcome::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// One recorded charge attempt against an order.
///
/// Created in `Initiated` state before the gateway is called so that a crash
/// mid-call still leaves a traceable record. The amount is copied from the
/// order at creation time and never taken from caller input.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub method: PaymentMethod,
    pub amount: Amount,
    pub gateway_reference: Option<String>,
    pub outcome: PaymentOutcome,
    pub created_at: DateTime<Utc>,
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl Payment {
    pub fn initiated(order_id: Uuid, method: PaymentMethod, amount: Amount) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            method,
            amount,
            gateway_reference: None,
            outcome: PaymentOutcome::Initiated,
            created_at: Utc::now(),
            last_checked_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_rejects_non_positive_values() {
        assert!(Amount::new(dec!(0.0)).is_err());
        assert!(Amount::new(dec!(-1.0)).is_err());
        assert_eq!(Amount::new(dec!(49.99)).unwrap().value(), dec!(49.99));
    }

    #[test]
    fn test_method_round_trips_through_str() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.as_str().parse::<PaymentMethod>(), Ok(method));
        }
        assert!("stripe_token".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_in_flight_covers_initiated_and_unknown() {
        assert!(PaymentOutcome::Initiated.is_in_flight());
        assert!(PaymentOutcome::Unknown.is_in_flight());
        assert!(!PaymentOutcome::Succeeded.is_in_flight());
        assert!(!PaymentOutcome::Failed.is_in_flight());
    }

    #[test]
    fn test_initiated_payment_has_no_gateway_reference() {
        let payment = Payment::initiated(
            Uuid::new_v4(),
            PaymentMethod::CreditCard,
            Amount::new(dec!(10.0)).unwrap(),
        );
        assert_eq!(payment.outcome, PaymentOutcome::Initiated);
        assert!(payment.gateway_reference.is_none());
        assert!(payment.last_checked_at.is_none());
    }
}
