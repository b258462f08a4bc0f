//! Domain entities, ports, and services.
//!
//! Everything in this module is transport and storage agnostic. Inbound
//! adapters translate HTTP requests into the driving-port types defined
//! under [`ports`]; outbound adapters implement the driven ports against
//! PostgreSQL and Redis. Services in this module are the only code allowed
//! to mutate booking status or unit availability.

pub mod availability;
pub mod booking;
pub mod booking_service;
pub mod error;
pub mod event;
pub mod payment;
pub mod payment_service;
pub mod policy;
pub mod ports;
pub mod unit;
pub mod unit_service;

pub use self::availability::{AvailabilityReconciler, ReconcileOutcome};
pub use self::booking::{Booking, BookingSnapshot, BookingStatus, BookingValidationError};
pub use self::booking_service::BookingLifecycleService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::event::{EventType, NewDomainEvent};
pub use self::payment::{
    Payment, PaymentMethod, PaymentSnapshot, PaymentStatus, PaymentValidationError,
};
pub use self::payment_service::PaymentService;
pub use self::policy::BookingPolicy;
pub use self::unit::{AccommodationType, Unit, UnitSnapshot, UnitValidationError};
pub use self::unit_service::UnitService;
