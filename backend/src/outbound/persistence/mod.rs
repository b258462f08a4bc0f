//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types — no business rules live here. The one deliberate
//!   exception is transaction scope: the booking adapter's compound
//!   operations run their unit and booking writes (and the creation-path
//!   exclusivity re-checks) inside a single database transaction, because
//!   atomicity is a storage concern the port contract demands.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: database failures map onto the port error
//!   enums; raw Diesel messages stay at debug-log level.

mod diesel_booking_repository;
mod diesel_error_mapping;
mod diesel_event_recorder;
mod diesel_payment_repository;
mod diesel_unit_repository;
mod models;
mod pool;
mod schema;

pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_event_recorder::DieselEventRecorder;
pub use diesel_payment_repository::DieselPaymentRepository;
pub use diesel_unit_repository::DieselUnitRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
