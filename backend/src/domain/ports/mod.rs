//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, the event recorder, the availability cache)
//! are implemented by outbound adapters; driving ports (command/query
//! traits) are implemented by the domain services and consumed by the HTTP
//! adapter.

mod availability_cache;
mod booking_ops;
mod booking_repository;
mod event_recorder;
mod payment_ops;
mod payment_repository;
mod unit_ops;
mod unit_repository;

pub use availability_cache::{AvailabilityCache, AvailabilityCacheError, NoOpAvailabilityCache};
#[cfg(test)]
pub use availability_cache::MockAvailabilityCache;
pub use booking_ops::{
    BookingCommand, BookingPayload, BookingQuery, BookingSweep, CancelBookingRequest,
    ConfirmBookingRequest, CreateBookingRequest, ListUserBookingsRequest, SweepOutcome,
};
#[cfg(test)]
pub use booking_ops::{MockBookingCommand, MockBookingQuery, MockBookingSweep};
pub use booking_repository::{BookingRepository, BookingRepositoryError};
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use event_recorder::{EventRecorder, EventRecorderError, NoOpEventRecorder};
#[cfg(test)]
pub use event_recorder::MockEventRecorder;
pub use payment_ops::{
    CreatePaymentRequest, PaymentCommand, PaymentPayload, PaymentQuery, ProcessPaymentRequest,
    RefundPaymentRequest, UpdatePaymentStatusRequest,
};
#[cfg(test)]
pub use payment_ops::{MockPaymentCommand, MockPaymentQuery};
pub use payment_repository::{PaymentRepository, PaymentRepositoryError};
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
pub use unit_ops::{
    CreateUnitRequest, DeleteUnitRequest, SearchUnitsRequest, UnitCommand, UnitDraft, UnitPayload,
    UnitQuery, UpdateUnitRequest,
};
#[cfg(test)]
pub use unit_ops::{MockUnitCommand, MockUnitQuery};
pub use unit_repository::{UnitRepository, UnitRepositoryError, UnitSearchFilter};
#[cfg(test)]
pub use unit_repository::MockUnitRepository;
