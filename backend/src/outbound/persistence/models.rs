//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::schema::{bookings, events, payments, units};

// ---------------------------------------------------------------------------
// Unit models
// ---------------------------------------------------------------------------

/// Row struct for reading from the units table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = units)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UnitRow {
    pub id: Uuid,
    pub number_of_rooms: i32,
    pub accommodation_type: String,
    pub floor: i32,
    pub base_price: Decimal,
    pub total_price: Decimal,
    pub description: String,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new unit records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = units)]
pub(crate) struct NewUnitRow<'a> {
    pub id: Uuid,
    pub number_of_rooms: i32,
    pub accommodation_type: &'a str,
    pub floor: i32,
    pub base_price: Decimal,
    pub total_price: Decimal,
    pub description: &'a str,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for updating existing unit records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = units)]
pub(crate) struct UnitUpdate<'a> {
    pub number_of_rooms: i32,
    pub accommodation_type: &'a str,
    pub floor: i32,
    pub base_price: Decimal,
    pub total_price: Decimal,
    pub description: &'a str,
    pub available: bool,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Booking models
// ---------------------------------------------------------------------------

/// Row struct for reading from the bookings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub user_id: Uuid,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub status: String,
    pub payment_deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new booking records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow<'a> {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub user_id: Uuid,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub status: &'a str,
    pub payment_deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for booking state transitions. Window, price, and deadline are
/// frozen at creation; only status and the audit timestamp ever change.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = bookings)]
pub(crate) struct BookingTransition<'a> {
    pub status: &'a str,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Payment models
// ---------------------------------------------------------------------------

/// Row struct for reading from the payments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PaymentRow {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub status: String,
    pub payment_method: String,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new payment records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub(crate) struct NewPaymentRow<'a> {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub status: &'a str,
    pub payment_method: &'a str,
    pub transaction_id: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for payment status transitions.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = payments)]
pub(crate) struct PaymentTransition<'a> {
    pub status: &'a str,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Event models
// ---------------------------------------------------------------------------

/// Insertable struct for appending audit events. Events are write-only;
/// there is no read row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_type: &'a str,
    pub entity_id: Option<Uuid>,
    pub description: &'a str,
    pub created_at: DateTime<Utc>,
}
