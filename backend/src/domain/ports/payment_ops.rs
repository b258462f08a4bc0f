//! Driving ports for payment recording.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, Payment, PaymentMethod, PaymentStatus};

/// Serializable payment projection returned by the driving ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Payment> for PaymentPayload {
    fn from(value: Payment) -> Self {
        Self {
            id: value.id(),
            booking_id: value.booking_id(),
            amount: value.amount(),
            status: value.status(),
            payment_method: value.method(),
            transaction_id: value.transaction_id().map(str::to_owned),
            created_at: value.created_at(),
            updated_at: value.updated_at(),
        }
    }
}

/// Request to record a payment against a pending booking.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePaymentRequest {
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub user_id: Uuid,
}

/// Request to process a pending payment, confirming its booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessPaymentRequest {
    pub payment_id: Uuid,
    pub user_id: Uuid,
}

/// Client-driven status change (e.g. mark a payment failed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdatePaymentStatusRequest {
    pub payment_id: Uuid,
    pub status: PaymentStatus,
    pub user_id: Uuid,
}

/// Request to refund a completed payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundPaymentRequest {
    pub payment_id: Uuid,
    pub user_id: Uuid,
}

/// Driving port for payment mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentCommand: Send + Sync {
    /// Record a pending payment for a booking awaiting payment.
    async fn create_payment(&self, request: CreatePaymentRequest)
    -> Result<PaymentPayload, Error>;

    /// Mark a pending payment completed and confirm its booking.
    async fn process_payment(
        &self,
        request: ProcessPaymentRequest,
    ) -> Result<PaymentPayload, Error>;

    /// Apply a client-driven status change.
    async fn update_payment_status(
        &self,
        request: UpdatePaymentStatusRequest,
    ) -> Result<PaymentPayload, Error>;

    /// Refund a completed payment.
    async fn refund_payment(&self, request: RefundPaymentRequest)
    -> Result<PaymentPayload, Error>;

    /// Cancel every pending payment of a booking.
    async fn cancel_pending_payments(&self, booking_id: Uuid, user_id: Uuid) -> Result<(), Error>;
}

/// Driving port for payment reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentQuery: Send + Sync {
    /// Fetch a payment by id.
    async fn get_payment(&self, payment_id: Uuid) -> Result<PaymentPayload, Error>;

    /// All payments recorded against a booking, oldest first.
    async fn list_booking_payments(&self, booking_id: Uuid)
    -> Result<Vec<PaymentPayload>, Error>;
}
