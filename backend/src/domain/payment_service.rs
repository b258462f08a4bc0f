//! Payment recording service.
//!
//! Payments are a status ledger, not a settlement integration: processing a
//! pending payment marks it completed and confirms the booking it pays for.
//! Unit availability is untouched here — a confirmed booking keeps its unit
//! held exactly as an explicit confirmation does.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    BookingRepository, BookingRepositoryError, CreatePaymentRequest, EventRecorder,
    PaymentCommand, PaymentPayload, PaymentQuery, PaymentRepository, PaymentRepositoryError,
    ProcessPaymentRequest, RefundPaymentRequest, UpdatePaymentStatusRequest,
};
use crate::domain::{
    BookingStatus, Error, EventType, NewDomainEvent, Payment, PaymentSnapshot, PaymentStatus,
};

fn map_payment_repo_error(error: PaymentRepositoryError) -> Error {
    match error {
        PaymentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("payment repository unavailable: {message}"))
        }
        PaymentRepositoryError::Query { message } => {
            Error::internal(format!("payment repository error: {message}"))
        }
    }
}

fn map_booking_repo_error(error: BookingRepositoryError) -> Error {
    match error {
        BookingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("booking repository unavailable: {message}"))
        }
        other => Error::internal(format!("booking repository error: {other}")),
    }
}

/// Service implementing the payment command and query ports.
#[derive(Clone)]
pub struct PaymentService<P, B, E> {
    payment_repo: Arc<P>,
    booking_repo: Arc<B>,
    event_recorder: Arc<E>,
    clock: Arc<dyn Clock>,
}

impl<P, B, E> PaymentService<P, B, E> {
    /// Create a new payment service.
    pub fn new(
        payment_repo: Arc<P>,
        booking_repo: Arc<B>,
        event_recorder: Arc<E>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            payment_repo,
            booking_repo,
            event_recorder,
            clock,
        }
    }
}

impl<P, B, E> PaymentService<P, B, E>
where
    P: PaymentRepository,
    B: BookingRepository,
    E: EventRecorder,
{
    async fn record_event(&self, event: NewDomainEvent) {
        if let Err(error) = self.event_recorder.record(event).await {
            warn!(%error, "audit event write failed");
        }
    }

    async fn load_payment(&self, payment_id: Uuid) -> Result<Payment, Error> {
        self.payment_repo
            .find_by_id(payment_id)
            .await
            .map_err(map_payment_repo_error)?
            .ok_or_else(|| Error::not_found(format!("payment {payment_id} not found")))
    }
}

#[async_trait]
impl<P, B, E> PaymentCommand for PaymentService<P, B, E>
where
    P: PaymentRepository,
    B: BookingRepository,
    E: EventRecorder,
{
    async fn create_payment(
        &self,
        request: CreatePaymentRequest,
    ) -> Result<PaymentPayload, Error> {
        let now = self.clock.utc();

        let booking = self
            .booking_repo
            .find_by_id(request.booking_id)
            .await
            .map_err(map_booking_repo_error)?
            .ok_or_else(|| Error::not_found(format!("booking {} not found", request.booking_id)))?;
        if booking.status() != BookingStatus::PendingPayment {
            return Err(Error::invalid_state(format!(
                "booking {} is not awaiting payment",
                booking.id()
            )));
        }

        let payment = Payment::new(PaymentSnapshot {
            id: Uuid::new_v4(),
            booking_id: booking.id(),
            amount: request.amount,
            status: PaymentStatus::Pending,
            method: request.payment_method,
            transaction_id: request.transaction_id,
            created_at: now,
            updated_at: now,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.payment_repo
            .save(&payment)
            .await
            .map_err(map_payment_repo_error)?;

        self.record_event(NewDomainEvent::for_entity(
            EventType::PaymentCreated,
            request.user_id,
            payment.id(),
            format!("Payment created for booking: {}", booking.id()),
            now,
        ))
        .await;

        info!(payment_id = %payment.id(), booking_id = %booking.id(), "payment recorded");
        Ok(PaymentPayload::from(payment))
    }

    async fn process_payment(
        &self,
        request: ProcessPaymentRequest,
    ) -> Result<PaymentPayload, Error> {
        let now = self.clock.utc();
        let mut payment = self.load_payment(request.payment_id).await?;

        if payment.status() != PaymentStatus::Pending {
            return Err(Error::invalid_state(format!(
                "payment {} is not pending",
                payment.id()
            )));
        }

        let mut booking = self
            .booking_repo
            .find_by_id(payment.booking_id())
            .await
            .map_err(map_booking_repo_error)?
            .ok_or_else(|| {
                Error::not_found(format!("booking {} not found", payment.booking_id()))
            })?;

        // Settling the payment is what confirms the booking; the unit stays
        // held, so availability is untouched.
        booking
            .transition_to(BookingStatus::Confirmed, now)
            .map_err(|err| Error::invalid_state(err.to_string()))?;

        payment.set_status(PaymentStatus::Completed, now);
        self.payment_repo
            .save(&payment)
            .await
            .map_err(map_payment_repo_error)?;
        self.booking_repo
            .save(&booking)
            .await
            .map_err(map_booking_repo_error)?;

        self.record_event(NewDomainEvent::for_entity(
            EventType::PaymentCompleted,
            request.user_id,
            payment.id(),
            format!("Payment completed for booking: {}", booking.id()),
            now,
        ))
        .await;

        info!(payment_id = %payment.id(), booking_id = %booking.id(), "payment processed, booking confirmed");
        Ok(PaymentPayload::from(payment))
    }

    async fn update_payment_status(
        &self,
        request: UpdatePaymentStatusRequest,
    ) -> Result<PaymentPayload, Error> {
        let now = self.clock.utc();
        let mut payment = self.load_payment(request.payment_id).await?;

        payment.set_status(request.status, now);
        self.payment_repo
            .save(&payment)
            .await
            .map_err(map_payment_repo_error)?;

        self.record_event(NewDomainEvent::for_entity(
            EventType::PaymentStatusUpdated,
            request.user_id,
            payment.id(),
            format!("Payment status updated to: {}", request.status),
            now,
        ))
        .await;

        Ok(PaymentPayload::from(payment))
    }

    async fn refund_payment(
        &self,
        request: RefundPaymentRequest,
    ) -> Result<PaymentPayload, Error> {
        let now = self.clock.utc();
        let mut payment = self.load_payment(request.payment_id).await?;

        if payment.status() != PaymentStatus::Completed {
            return Err(Error::invalid_state(format!(
                "payment {} is not completed",
                payment.id()
            )));
        }

        payment.set_status(PaymentStatus::Refunded, now);
        self.payment_repo
            .save(&payment)
            .await
            .map_err(map_payment_repo_error)?;

        self.record_event(NewDomainEvent::for_entity(
            EventType::PaymentRefunded,
            request.user_id,
            payment.id(),
            format!("Payment refunded for booking: {}", payment.booking_id()),
            now,
        ))
        .await;

        Ok(PaymentPayload::from(payment))
    }

    async fn cancel_pending_payments(&self, booking_id: Uuid, user_id: Uuid) -> Result<(), Error> {
        let now = self.clock.utc();
        let pending = self
            .payment_repo
            .find_by_booking_and_status(booking_id, PaymentStatus::Pending)
            .await
            .map_err(map_payment_repo_error)?;

        for mut payment in pending {
            payment.set_status(PaymentStatus::Cancelled, now);
            self.payment_repo
                .save(&payment)
                .await
                .map_err(map_payment_repo_error)?;

            self.record_event(NewDomainEvent::for_entity(
                EventType::PaymentCancelled,
                user_id,
                payment.id(),
                format!("Payment cancelled for booking: {booking_id}"),
                now,
            ))
            .await;
        }
        Ok(())
    }
}

#[async_trait]
impl<P, B, E> PaymentQuery for PaymentService<P, B, E>
where
    P: PaymentRepository,
    B: BookingRepository,
    E: EventRecorder,
{
    async fn get_payment(&self, payment_id: Uuid) -> Result<PaymentPayload, Error> {
        let payment = self.load_payment(payment_id).await?;
        Ok(PaymentPayload::from(payment))
    }

    async fn list_booking_payments(
        &self,
        booking_id: Uuid,
    ) -> Result<Vec<PaymentPayload>, Error> {
        let payments = self
            .payment_repo
            .find_by_booking(booking_id)
            .await
            .map_err(map_payment_repo_error)?;
        Ok(payments.into_iter().map(PaymentPayload::from).collect())
    }
}

#[cfg(test)]
#[path = "payment_service_tests.rs"]
mod tests;
