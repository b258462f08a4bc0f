//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the deployed migrations exactly; Diesel
//! uses them for compile-time query validation and type-safe SQL
//! generation.

diesel::table! {
    /// Accommodation units.
    ///
    /// `available` is denormalized booking state: false while any booking
    /// in PENDING_PAYMENT or CONFIRMED holds the unit. Only the booking
    /// adapters flip it, and only inside a transaction with the booking
    /// write.
    units (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Number of rooms (at least 1).
        number_of_rooms -> Int4,
        /// Accommodation category (HOME, FLAT, APARTMENTS).
        accommodation_type -> Varchar,
        /// Floor the unit is on.
        floor -> Int4,
        /// Price before the system markup.
        base_price -> Numeric,
        /// Advertised price including the system markup.
        total_price -> Numeric,
        /// Free-text description.
        description -> Text,
        /// Whether the unit can accept a new booking.
        available -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Bookings; rows are never deleted, terminal states are history.
    bookings (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unit this booking holds.
        unit_id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Stay start.
        check_in_date -> Timestamptz,
        /// Stay end; strictly after `check_in_date`.
        check_out_date -> Timestamptz,
        /// Total price frozen at creation.
        total_price -> Numeric,
        /// Lifecycle status (PENDING_PAYMENT, CONFIRMED, CANCELLED,
        /// COMPLETED).
        status -> Varchar,
        /// Instant the expiry sweep acts on for pending bookings.
        payment_deadline -> Timestamptz,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recorded payment attempts.
    payments (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Booking the payment settles.
        booking_id -> Uuid,
        /// Paid amount.
        amount -> Numeric,
        /// Payment status (PENDING, COMPLETED, FAILED, REFUNDED,
        /// CANCELLED).
        status -> Varchar,
        /// Payment method.
        payment_method -> Varchar,
        /// External transaction reference, if any.
        transaction_id -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit events; never updated or read back by the core.
    events (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Acting user.
        user_id -> Uuid,
        /// Enumerated domain action.
        event_type -> Varchar,
        /// Referenced entity, if any.
        entity_id -> Nullable<Uuid>,
        /// Free-text description.
        description -> Text,
        /// Instant the action occurred.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(bookings -> units (unit_id));
diesel::joinable!(payments -> bookings (booking_id));

diesel::allow_tables_to_appear_in_same_query!(units, bookings, payments, events);
