//! Driving ports for booking commands, queries, and sweeps.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Booking, BookingStatus, Error};

/// Serializable booking projection returned by the driving ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub user_id: Uuid,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub payment_deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingPayload {
    fn from(value: Booking) -> Self {
        Self {
            id: value.id(),
            unit_id: value.unit_id(),
            user_id: value.user_id(),
            check_in_date: value.check_in(),
            check_out_date: value.check_out(),
            total_price: value.total_price(),
            status: value.status(),
            payment_deadline: value.payment_deadline(),
            created_at: value.created_at(),
            updated_at: value.updated_at(),
        }
    }
}

/// Request to create a booking.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateBookingRequest {
    pub unit_id: Uuid,
    pub user_id: Uuid,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
}

/// Request to confirm a pending booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmBookingRequest {
    pub booking_id: Uuid,
    pub user_id: Uuid,
}

/// Request to cancel a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelBookingRequest {
    pub booking_id: Uuid,
    pub user_id: Uuid,
}

/// Request to page through one user's bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListUserBookingsRequest {
    pub user_id: Uuid,
    pub page: PageRequest,
}

/// Driving port for booking mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// Create a booking, holding the unit for the payment window.
    async fn create_booking(&self, request: CreateBookingRequest)
    -> Result<BookingPayload, Error>;

    /// Confirm a pending booking; the unit stays held through the stay.
    async fn confirm_booking(
        &self,
        request: ConfirmBookingRequest,
    ) -> Result<BookingPayload, Error>;

    /// Cancel a booking and release its unit.
    async fn cancel_booking(&self, request: CancelBookingRequest)
    -> Result<BookingPayload, Error>;
}

/// Driving port for booking reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingQuery: Send + Sync {
    /// Fetch a booking by id.
    async fn get_booking(&self, booking_id: Uuid) -> Result<BookingPayload, Error>;

    /// Page through a user's bookings, most recent first.
    async fn list_user_bookings(
        &self,
        request: ListUserBookingsRequest,
    ) -> Result<Page<BookingPayload>, Error>;
}

/// Totals from one sweep pass, for logging and no-op assertions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Bookings matched by the sweep predicate.
    pub selected: usize,
    /// Bookings successfully transitioned.
    pub transitioned: usize,
    /// Bookings whose per-item transaction failed; retried next cycle.
    pub failed: usize,
}

impl SweepOutcome {
    /// Whether the sweep performed no writes at all.
    pub fn is_noop(&self) -> bool {
        self.selected == 0
    }
}

/// Driving port for the time-driven sweeps. Invoked by the scheduler with
/// no caller identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingSweep: Send + Sync {
    /// Cancel pending bookings whose payment deadline has passed and
    /// release their units.
    async fn process_expired_bookings(&self) -> Result<SweepOutcome, Error>;

    /// Complete confirmed bookings whose stay has ended and release their
    /// units.
    async fn process_completed_bookings(&self) -> Result<SweepOutcome, Error>;
}
