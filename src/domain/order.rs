use crate::domain::payment::{Amount, PaymentOutcome};
use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Paid,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// A customer order as seen by the payment engine.
///
/// Orders are created and authorized by the surrounding service; the engine
/// only reads them and moves their status through `advance`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total: Amount,
    pub status: OrderStatus,
}

impl Order {
    pub fn new(user_id: Uuid, total: Amount, status: OrderStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            total,
            status,
        }
    }

    /// Authorization helper for the calling layer; the engine itself trusts
    /// the order it is handed.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// A payment attempt may only be created against a confirmed order.
    pub fn check_eligible(&self) -> Result<()> {
        if self.status == OrderStatus::Confirmed {
            Ok(())
        } else {
            Err(PaymentError::IneligibleOrderState {
                status: self.status,
            })
        }
    }

    /// Moves the order according to a recorded payment outcome.
    ///
    /// Defined only from `Confirmed`; anything else means the caller skipped
    /// `check_eligible` and is reported as `InvalidTransition`. A failed
    /// outcome keeps the order confirmed so the customer can retry with a
    /// fresh attempt, and an unknown outcome keeps it confirmed until
    /// reconciliation settles the attempt. The engine never guesses success.
    pub fn advance(&mut self, outcome: PaymentOutcome) -> Result<()> {
        if self.status != OrderStatus::Confirmed {
            return Err(PaymentError::InvalidTransition { from: self.status });
        }
        if outcome == PaymentOutcome::Succeeded {
            self.status = OrderStatus::Paid;
        }
        Ok(())
    }
}
