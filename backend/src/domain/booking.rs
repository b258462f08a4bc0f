//! Booking entity and its status machine.
//!
//! A booking reserves one unit for a date window and progresses through a
//! fixed lifecycle:
//!
//! ```text
//! PENDING_PAYMENT ──confirm / payment──▶ CONFIRMED ──completion sweep──▶ COMPLETED
//!        │                                   │
//!        └──cancel / expiry sweep──▶ CANCELLED ◀──cancel──┘
//! ```
//!
//! `CANCELLED` and `COMPLETED` are terminal; no transition leaves them. The
//! total price is computed once at creation and frozen thereafter.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    PendingPayment,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Statuses that hold the unit (keep `available == false`).
    pub const ACTIVE: [Self; 2] = [Self::PendingPayment, Self::Confirmed];

    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PendingPayment => "PENDING_PAYMENT",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
        }
    }

    /// Whether this status keeps the unit held.
    pub fn holds_unit(self) -> bool {
        matches!(self, Self::PendingPayment | Self::Confirmed)
    }

    /// Whether any transition may leave this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = BookingValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PENDING_PAYMENT" => Ok(Self::PendingPayment),
            "CONFIRMED" => Ok(Self::Confirmed),
            "CANCELLED" => Ok(Self::Cancelled),
            "COMPLETED" => Ok(Self::Completed),
            other => Err(BookingValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validation failures for booking construction and transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingValidationError {
    #[error("check-out must be strictly after check-in")]
    WindowInverted,
    #[error("unknown booking status: {value}")]
    UnknownStatus { value: String },
    #[error("booking cannot move from {from} to {to}")]
    IllegalTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
}

/// Full state needed to (re)construct a [`Booking`].
#[derive(Debug, Clone)]
pub struct BookingSnapshot {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub user_id: Uuid,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub payment_deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A reservation of a unit for a date range, owned by one user.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    id: Uuid,
    unit_id: Uuid,
    user_id: Uuid,
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
    total_price: Decimal,
    status: BookingStatus,
    payment_deadline: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Booking {
    /// Create a validated booking from a snapshot.
    ///
    /// The window invariant (`check_out > check_in`) holds for every
    /// booking, stored or new. "Dates lie in the future" is a creation-time
    /// rule owned by the lifecycle service, not an entity invariant —
    /// historical bookings legitimately have past dates.
    pub fn new(snapshot: BookingSnapshot) -> Result<Self, BookingValidationError> {
        if snapshot.check_out <= snapshot.check_in {
            return Err(BookingValidationError::WindowInverted);
        }
        Ok(Self {
            id: snapshot.id,
            unit_id: snapshot.unit_id,
            user_id: snapshot.user_id,
            check_in: snapshot.check_in,
            check_out: snapshot.check_out,
            total_price: snapshot.total_price,
            status: snapshot.status,
            payment_deadline: snapshot.payment_deadline,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn unit_id(&self) -> Uuid {
        self.unit_id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn check_in(&self) -> DateTime<Utc> {
        self.check_in
    }

    pub fn check_out(&self) -> DateTime<Utc> {
        self.check_out
    }

    /// Frozen total price, computed once at creation.
    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    pub fn status(&self) -> BookingStatus {
        self.status
    }

    pub fn payment_deadline(&self) -> DateTime<Utc> {
        self.payment_deadline
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `user_id` owns this booking.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Apply a status transition, enforcing the lifecycle table.
    ///
    /// Legal moves: `PENDING_PAYMENT → CONFIRMED`,
    /// `PENDING_PAYMENT → CANCELLED`, `CONFIRMED → CANCELLED`,
    /// `CONFIRMED → COMPLETED`. Everything else fails with
    /// [`BookingValidationError::IllegalTransition`], including repeated
    /// cancellation.
    pub fn transition_to(
        &mut self,
        next: BookingStatus,
        now: DateTime<Utc>,
    ) -> Result<(), BookingValidationError> {
        let legal = matches!(
            (self.status, next),
            (BookingStatus::PendingPayment, BookingStatus::Confirmed)
                | (BookingStatus::PendingPayment, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Completed)
        );
        if !legal {
            return Err(BookingValidationError::IllegalTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }
}
