//! Booking lifecycle engine.
//!
//! Owns every booking state transition and every unit-availability flip:
//! creation (hold the unit for the payment window), confirmation,
//! cancellation, and the two time-driven sweeps. The service performs
//! advisory availability/overlap checks for precise error messages on the
//! fast path; the authoritative guard against concurrent creators is the
//! repository's transactional `create_pending` (row-level exclusivity on
//! the unit).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    AvailabilityCache, BookingCommand, BookingPayload, BookingQuery, BookingRepository,
    BookingRepositoryError, BookingSweep, CancelBookingRequest, ConfirmBookingRequest,
    CreateBookingRequest, EventRecorder, ListUserBookingsRequest, SweepOutcome, UnitRepository,
    UnitRepositoryError,
};
use crate::domain::{
    Booking, BookingPolicy, BookingSnapshot, BookingStatus, Error, EventType, NewDomainEvent,
};

use pagination::Page;

fn map_booking_repo_error(error: BookingRepositoryError) -> Error {
    match error {
        BookingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("booking repository unavailable: {message}"))
        }
        BookingRepositoryError::Query { message } => {
            Error::internal(format!("booking repository error: {message}"))
        }
        BookingRepositoryError::UnitNotFound { unit_id } => {
            Error::not_found(format!("unit {unit_id} not found"))
        }
        BookingRepositoryError::UnitUnavailable { unit_id } => {
            Error::conflict(format!("unit {unit_id} is not available"))
        }
        BookingRepositoryError::Overlap { unit_id } => Error::conflict(format!(
            "unit {unit_id} is already booked for the selected dates"
        )),
    }
}

fn map_unit_repo_error(error: UnitRepositoryError) -> Error {
    match error {
        UnitRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("unit repository unavailable: {message}"))
        }
        UnitRepositoryError::Query { message } => {
            Error::internal(format!("unit repository error: {message}"))
        }
    }
}

/// Engine implementing the booking command, query, and sweep ports.
#[derive(Clone)]
pub struct BookingLifecycleService<B, U, E, C> {
    booking_repo: Arc<B>,
    unit_repo: Arc<U>,
    event_recorder: Arc<E>,
    availability_cache: Arc<C>,
    clock: Arc<dyn Clock>,
    policy: BookingPolicy,
}

impl<B, U, E, C> BookingLifecycleService<B, U, E, C> {
    /// Create a new engine.
    pub fn new(
        booking_repo: Arc<B>,
        unit_repo: Arc<U>,
        event_recorder: Arc<E>,
        availability_cache: Arc<C>,
        clock: Arc<dyn Clock>,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            booking_repo,
            unit_repo,
            event_recorder,
            availability_cache,
            clock,
            policy,
        }
    }
}

impl<B, U, E, C> BookingLifecycleService<B, U, E, C>
where
    B: BookingRepository,
    U: UnitRepository,
    E: EventRecorder,
    C: AvailabilityCache,
{
    /// Append an audit event, swallowing failures.
    async fn record_event(&self, event: NewDomainEvent) {
        if let Err(error) = self.event_recorder.record(event).await {
            warn!(%error, "audit event write failed");
        }
    }

    /// Drop the cached availability count, swallowing failures. The
    /// periodic reconciliation heals anything missed here.
    async fn invalidate_availability(&self) {
        if let Err(error) = self.availability_cache.invalidate().await {
            warn!(%error, "availability cache invalidation failed");
        }
    }

    async fn load_booking(&self, booking_id: Uuid) -> Result<Booking, Error> {
        self.booking_repo
            .find_by_id(booking_id)
            .await
            .map_err(map_booking_repo_error)?
            .ok_or_else(|| Error::not_found(format!("booking {booking_id} not found")))
    }

    fn validate_window(
        &self,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), Error> {
        if check_in <= now {
            return Err(Error::invalid_request(format!(
                "check-in date {check_in} must be in the future"
            )));
        }
        if check_out <= now || check_out <= check_in {
            return Err(Error::invalid_request(format!(
                "check-out date {check_out} must be in the future and after check-in"
            )));
        }
        Ok(())
    }

    async fn expire_one(&self, booking: &mut Booking, now: DateTime<Utc>) -> Result<(), Error> {
        booking
            .transition_to(BookingStatus::Cancelled, now)
            .map_err(|err| Error::invalid_state(err.to_string()))?;
        self.booking_repo
            .save_releasing_unit(booking)
            .await
            .map_err(map_booking_repo_error)?;
        self.invalidate_availability().await;
        self.record_event(NewDomainEvent::for_entity(
            EventType::BookingExpired,
            booking.user_id(),
            booking.id(),
            "Booking expired and cancelled",
            now,
        ))
        .await;
        info!(booking_id = %booking.id(), unit_id = %booking.unit_id(), "expired booking cancelled, unit released");
        Ok(())
    }

    async fn complete_one(&self, booking: &mut Booking, now: DateTime<Utc>) -> Result<(), Error> {
        booking
            .transition_to(BookingStatus::Completed, now)
            .map_err(|err| Error::invalid_state(err.to_string()))?;
        self.booking_repo
            .save_releasing_unit(booking)
            .await
            .map_err(map_booking_repo_error)?;
        self.invalidate_availability().await;
        self.record_event(NewDomainEvent::for_entity(
            EventType::BookingCompleted,
            booking.user_id(),
            booking.id(),
            "Booking completed",
            now,
        ))
        .await;
        info!(booking_id = %booking.id(), unit_id = %booking.unit_id(), "stay completed, unit released");
        Ok(())
    }
}

#[async_trait]
impl<B, U, E, C> BookingCommand for BookingLifecycleService<B, U, E, C>
where
    B: BookingRepository,
    U: UnitRepository,
    E: EventRecorder,
    C: AvailabilityCache,
{
    async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<BookingPayload, Error> {
        let now = self.clock.utc();

        let unit = self
            .unit_repo
            .find_by_id(request.unit_id)
            .await
            .map_err(map_unit_repo_error)?
            .ok_or_else(|| Error::not_found(format!("unit {} not found", request.unit_id)))?;

        if !unit.available() {
            return Err(Error::conflict(format!(
                "unit {} is not available",
                unit.id()
            )));
        }

        self.validate_window(request.check_in_date, request.check_out_date, now)?;

        // Advisory overlap guard. The transactional re-check inside
        // `create_pending` is authoritative under race.
        let overlapping = self
            .booking_repo
            .find_overlapping(
                request.unit_id,
                &BookingStatus::ACTIVE,
                request.check_in_date,
                request.check_out_date,
            )
            .await
            .map_err(map_booking_repo_error)?;
        if !overlapping.is_empty() {
            return Err(Error::conflict(format!(
                "unit {} is already booked for the selected dates",
                request.unit_id
            )));
        }

        let total_price = self.policy.quote_total_price(unit.base_price());
        let payment_deadline = self.policy.payment_deadline(now);

        let booking = Booking::new(BookingSnapshot {
            id: Uuid::new_v4(),
            unit_id: request.unit_id,
            user_id: request.user_id,
            check_in: request.check_in_date,
            check_out: request.check_out_date,
            total_price,
            status: BookingStatus::PendingPayment,
            payment_deadline,
            created_at: now,
            updated_at: now,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.booking_repo
            .create_pending(&booking)
            .await
            .map_err(map_booking_repo_error)?;
        self.invalidate_availability().await;

        self.record_event(NewDomainEvent::for_entity(
            EventType::BookingCreated,
            request.user_id,
            booking.id(),
            format!(
                "Booking created with total price {total_price} and payment deadline {payment_deadline}"
            ),
            now,
        ))
        .await;

        info!(
            booking_id = %booking.id(),
            unit_id = %booking.unit_id(),
            user_id = %request.user_id,
            %total_price,
            "created booking, unit held until payment"
        );
        Ok(BookingPayload::from(booking))
    }

    async fn confirm_booking(
        &self,
        request: ConfirmBookingRequest,
    ) -> Result<BookingPayload, Error> {
        let now = self.clock.utc();
        let mut booking = self.load_booking(request.booking_id).await?;

        if !booking.is_owned_by(request.user_id) {
            return Err(Error::forbidden(
                "user is not authorized to confirm this booking",
            ));
        }

        booking
            .transition_to(BookingStatus::Confirmed, now)
            .map_err(|err| Error::invalid_state(err.to_string()))?;
        self.booking_repo
            .save(&booking)
            .await
            .map_err(map_booking_repo_error)?;

        // The unit stays unavailable: a confirmed booking holds it
        // through the stay.
        self.record_event(NewDomainEvent::for_entity(
            EventType::BookingConfirmed,
            request.user_id,
            booking.id(),
            "Booking confirmed",
            now,
        ))
        .await;

        info!(booking_id = %booking.id(), unit_id = %booking.unit_id(), "booking confirmed, unit remains held");
        Ok(BookingPayload::from(booking))
    }

    async fn cancel_booking(
        &self,
        request: CancelBookingRequest,
    ) -> Result<BookingPayload, Error> {
        let now = self.clock.utc();
        let mut booking = self.load_booking(request.booking_id).await?;

        if !booking.is_owned_by(request.user_id) {
            return Err(Error::forbidden(
                "user is not authorized to cancel this booking",
            ));
        }

        booking
            .transition_to(BookingStatus::Cancelled, now)
            .map_err(|err| Error::invalid_state(err.to_string()))?;
        self.booking_repo
            .save_releasing_unit(&booking)
            .await
            .map_err(map_booking_repo_error)?;
        self.invalidate_availability().await;

        self.record_event(NewDomainEvent::for_entity(
            EventType::BookingCancelled,
            request.user_id,
            booking.id(),
            "Booking cancelled",
            now,
        ))
        .await;

        info!(booking_id = %booking.id(), unit_id = %booking.unit_id(), "booking cancelled, unit released");
        Ok(BookingPayload::from(booking))
    }
}

#[async_trait]
impl<B, U, E, C> BookingQuery for BookingLifecycleService<B, U, E, C>
where
    B: BookingRepository,
    U: UnitRepository,
    E: EventRecorder,
    C: AvailabilityCache,
{
    async fn get_booking(&self, booking_id: Uuid) -> Result<BookingPayload, Error> {
        let booking = self.load_booking(booking_id).await?;
        Ok(BookingPayload::from(booking))
    }

    async fn list_user_bookings(
        &self,
        request: ListUserBookingsRequest,
    ) -> Result<Page<BookingPayload>, Error> {
        let bookings = self
            .booking_repo
            .find_by_user(request.user_id, request.page)
            .await
            .map_err(map_booking_repo_error)?;
        Ok(bookings.map(BookingPayload::from))
    }
}

#[async_trait]
impl<B, U, E, C> BookingSweep for BookingLifecycleService<B, U, E, C>
where
    B: BookingRepository,
    U: UnitRepository,
    E: EventRecorder,
    C: AvailabilityCache,
{
    async fn process_expired_bookings(&self) -> Result<SweepOutcome, Error> {
        let now = self.clock.utc();
        let expired = self
            .booking_repo
            .find_by_status_and_deadline_before(BookingStatus::PendingPayment, now)
            .await
            .map_err(map_booking_repo_error)?;

        let mut outcome = SweepOutcome {
            selected: expired.len(),
            ..SweepOutcome::default()
        };
        for mut booking in expired {
            match self.expire_one(&mut booking, now).await {
                Ok(()) => outcome.transitioned += 1,
                Err(error) => {
                    outcome.failed += 1;
                    warn!(booking_id = %booking.id(), %error, "expiry sweep item failed, continuing");
                }
            }
        }
        Ok(outcome)
    }

    async fn process_completed_bookings(&self) -> Result<SweepOutcome, Error> {
        let now = self.clock.utc();
        let completed = self
            .booking_repo
            .find_by_status_and_checkout_before(BookingStatus::Confirmed, now)
            .await
            .map_err(map_booking_repo_error)?;

        let mut outcome = SweepOutcome {
            selected: completed.len(),
            ..SweepOutcome::default()
        };
        for mut booking in completed {
            match self.complete_one(&mut booking, now).await {
                Ok(()) => outcome.transitioned += 1,
                Err(error) => {
                    outcome.failed += 1;
                    warn!(booking_id = %booking.id(), %error, "completion sweep item failed, continuing");
                }
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
