//! Port for payment persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Payment, PaymentStatus};

/// Errors raised by payment repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentRepositoryError {
    /// Repository connection could not be established.
    #[error("payment repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("payment repository query failed: {message}")]
    Query { message: String },
}

impl PaymentRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for reading and writing payments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Find a payment by id.
    async fn find_by_id(&self, payment_id: Uuid)
    -> Result<Option<Payment>, PaymentRepositoryError>;

    /// Insert or update a payment.
    async fn save(&self, payment: &Payment) -> Result<(), PaymentRepositoryError>;

    /// All payments recorded against a booking, oldest first.
    async fn find_by_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Vec<Payment>, PaymentRepositoryError>;

    /// Payments for the booking currently in `status`.
    async fn find_by_booking_and_status(
        &self,
        booking_id: Uuid,
        status: PaymentStatus,
    ) -> Result<Vec<Payment>, PaymentRepositoryError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn error_constructors_format_messages() {
        assert!(
            PaymentRepositoryError::connection("refused")
                .to_string()
                .contains("refused")
        );
        assert!(
            PaymentRepositoryError::query("broken sql")
                .to_string()
                .contains("broken sql")
        );
    }
}
