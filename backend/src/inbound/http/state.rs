//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend
//! only on domain driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BookingCommand, BookingQuery, PaymentCommand, PaymentQuery, UnitCommand, UnitQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub bookings: Arc<dyn BookingCommand>,
    pub bookings_query: Arc<dyn BookingQuery>,
    pub units: Arc<dyn UnitCommand>,
    pub units_query: Arc<dyn UnitQuery>,
    pub payments: Arc<dyn PaymentCommand>,
    pub payments_query: Arc<dyn PaymentQuery>,
}

impl HttpState {
    /// Bundle the port implementations for handler injection.
    pub fn new(
        bookings: Arc<dyn BookingCommand>,
        bookings_query: Arc<dyn BookingQuery>,
        units: Arc<dyn UnitCommand>,
        units_query: Arc<dyn UnitQuery>,
        payments: Arc<dyn PaymentCommand>,
        payments_query: Arc<dyn PaymentQuery>,
    ) -> Self {
        Self {
            bookings,
            bookings_query,
            units,
            units_query,
            payments,
            payments_query,
        }
    }
}
