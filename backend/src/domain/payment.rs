//! Payment entity.
//!
//! Payment processing here is a recorded status transition, not a
//! settlement flow: completing a payment is what implicitly confirms its
//! booking.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
    Cancelled,
}

impl PaymentStatus {
    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Refunded => "REFUNDED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = PaymentValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            "REFUNDED" => Ok(Self::Refunded),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(PaymentValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// How the payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    BankTransfer,
    Paypal,
    Crypto,
}

impl PaymentMethod {
    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "CREDIT_CARD",
            Self::DebitCard => "DEBIT_CARD",
            Self::BankTransfer => "BANK_TRANSFER",
            Self::Paypal => "PAYPAL",
            Self::Crypto => "CRYPTO",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = PaymentValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CREDIT_CARD" => Ok(Self::CreditCard),
            "DEBIT_CARD" => Ok(Self::DebitCard),
            "BANK_TRANSFER" => Ok(Self::BankTransfer),
            "PAYPAL" => Ok(Self::Paypal),
            "CRYPTO" => Ok(Self::Crypto),
            other => Err(PaymentValidationError::UnknownMethod {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validation failures for payment construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentValidationError {
    #[error("payment amount must be positive, got {value}")]
    NonPositiveAmount { value: Decimal },
    #[error("unknown payment status: {value}")]
    UnknownStatus { value: String },
    #[error("unknown payment method: {value}")]
    UnknownMethod { value: String },
}

/// Full state needed to (re)construct a [`Payment`].
#[derive(Debug, Clone)]
pub struct PaymentSnapshot {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A recorded payment attempt against one booking.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    id: Uuid,
    booking_id: Uuid,
    amount: Decimal,
    status: PaymentStatus,
    method: PaymentMethod,
    transaction_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Payment {
    /// Create a validated payment from a snapshot.
    pub fn new(snapshot: PaymentSnapshot) -> Result<Self, PaymentValidationError> {
        if snapshot.amount <= Decimal::ZERO {
            return Err(PaymentValidationError::NonPositiveAmount {
                value: snapshot.amount,
            });
        }
        Ok(Self {
            id: snapshot.id,
            booking_id: snapshot.booking_id,
            amount: snapshot.amount,
            status: snapshot.status,
            method: snapshot.method,
            transaction_id: snapshot.transaction_id,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn booking_id(&self) -> Uuid {
        self.booking_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Record a status change. Payments are a client-driven ledger; the
    /// services own which moves are offered, the entity only stamps them.
    pub fn set_status(&mut self, status: PaymentStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::Utc;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;

    fn snapshot() -> PaymentSnapshot {
        let now = Utc::now();
        PaymentSnapshot {
            id: Uuid::new_v4(),
            booking_id: Uuid::new_v4(),
            amount: dec!(115.00),
            status: PaymentStatus::Pending,
            method: PaymentMethod::CreditCard,
            transaction_id: Some("tx-42".to_owned()),
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn non_positive_amount_is_rejected() {
        let mut draft = snapshot();
        draft.amount = dec!(-1.00);
        let error = Payment::new(draft).expect_err("negative amount");
        assert!(matches!(
            error,
            PaymentValidationError::NonPositiveAmount { .. }
        ));
    }

    #[rstest]
    fn set_status_stamps_updated_at() {
        let mut payment = Payment::new(snapshot()).expect("valid payment");
        let later = Utc::now();
        payment.set_status(PaymentStatus::Completed, later);
        assert_eq!(payment.status(), PaymentStatus::Completed);
        assert_eq!(payment.updated_at(), later);
    }

    #[rstest]
    fn method_and_status_round_trip() {
        for method in [
            PaymentMethod::CreditCard,
            PaymentMethod::DebitCard,
            PaymentMethod::BankTransfer,
            PaymentMethod::Paypal,
            PaymentMethod::Crypto,
        ] {
            let parsed: PaymentMethod = method.as_str().parse().expect("known method");
            assert_eq!(parsed, method);
        }
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Completed,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
            PaymentStatus::Cancelled,
        ] {
            let parsed: PaymentStatus = status.as_str().parse().expect("known status");
            assert_eq!(parsed, status);
        }
    }
}
