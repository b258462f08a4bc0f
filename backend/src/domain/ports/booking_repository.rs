//! Port for booking persistence and the unit-coupled atomic operations.
//!
//! The two compound operations (`create_pending`, `save_releasing_unit`)
//! exist because a booking transition and its unit-availability write must
//! succeed or fail together. Adapters implement each as one database
//! transaction; `create_pending` additionally carries the row-level
//! exclusivity guard that makes concurrent creation safe.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::{Booking, BookingStatus};

/// Errors raised by booking repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingRepositoryError {
    /// Repository connection could not be established.
    #[error("booking repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("booking repository query failed: {message}")]
    Query { message: String },
    /// The referenced unit does not exist.
    #[error("unit {unit_id} not found")]
    UnitNotFound { unit_id: Uuid },
    /// The unit was already held when the transactional re-check ran.
    #[error("unit {unit_id} is not available")]
    UnitUnavailable { unit_id: Uuid },
    /// An active booking overlaps the requested window.
    #[error("unit {unit_id} is already booked for the selected dates")]
    Overlap { unit_id: Uuid },
}

impl BookingRepositoryError {
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

    /// Create a unit-not-found error.
    pub fn unit_not_found(unit_id: Uuid) -> Self {
        Self::UnitNotFound { unit_id }
    }

    /// Create a unit-unavailable error.
    pub fn unit_unavailable(unit_id: Uuid) -> Self {
        Self::UnitUnavailable { unit_id }
    }

    /// Create an overlap error.
    pub fn overlap(unit_id: Uuid) -> Self {
        Self::Overlap { unit_id }
    }
}

/// Port for booking reads and the atomic booking/unit mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Find a booking by id.
    async fn find_by_id(&self, booking_id: Uuid) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Atomically hold the unit and insert the pending booking.
    ///
    /// Inside one transaction the adapter must: lock the unit row, re-check
    /// `available`, re-check the overlap predicate, flip the unit to
    /// unavailable, and insert the booking — in that order. Exactly one of
    /// two concurrent callers targeting the same unit may succeed; the
    /// loser sees [`BookingRepositoryError::UnitUnavailable`] or
    /// [`BookingRepositoryError::Overlap`].
    async fn create_pending(&self, booking: &Booking) -> Result<(), BookingRepositoryError>;

    /// Update a booking row without touching its unit (confirm path).
    async fn save(&self, booking: &Booking) -> Result<(), BookingRepositoryError>;

    /// Atomically update the booking and release its unit
    /// (`available = true`). Used by cancellation and both sweeps.
    async fn save_releasing_unit(&self, booking: &Booking) -> Result<(), BookingRepositoryError>;

    /// Bookings on the unit, in any of `statuses`, whose window overlaps
    /// `[check_in, check_out]` with inclusive boundaries.
    async fn find_overlapping(
        &self,
        unit_id: Uuid,
        statuses: &[BookingStatus],
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> Result<Vec<Booking>, BookingRepositoryError>;

    /// Bookings in `status` whose payment deadline lies strictly before
    /// `instant`. Drives the expiry sweep.
    async fn find_by_status_and_deadline_before(
        &self,
        status: BookingStatus,
        instant: DateTime<Utc>,
    ) -> Result<Vec<Booking>, BookingRepositoryError>;

    /// Bookings in `status` whose check-out lies at or before `instant`.
    /// Drives the completion sweep.
    async fn find_by_status_and_checkout_before(
        &self,
        status: BookingStatus,
        instant: DateTime<Utc>,
    ) -> Result<Vec<Booking>, BookingRepositoryError>;

    /// Page through a user's bookings, most recent first.
    async fn find_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Booking>, BookingRepositoryError>;

    /// Whether any booking in an active status references the unit.
    async fn exists_active_for_unit(&self, unit_id: Uuid)
    -> Result<bool, BookingRepositoryError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn conflict_variants_name_the_unit() {
        let unit_id = Uuid::new_v4();
        let unavailable = BookingRepositoryError::unit_unavailable(unit_id);
        let overlap = BookingRepositoryError::overlap(unit_id);
        assert!(unavailable.to_string().contains(&unit_id.to_string()));
        assert!(overlap.to_string().contains("already booked"));
    }

    #[rstest]
    fn query_error_formats_message() {
        let error = BookingRepositoryError::query("broken sql");
        assert!(error.to_string().contains("broken sql"));
    }
}
