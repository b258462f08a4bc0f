//! Domain audit events.
//!
//! Events are an append-only trail written through the
//! [`EventRecorder`](crate::domain::ports::EventRecorder) port. The core
//! never reads them back; recording is best-effort and must never fail a
//! state transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Enumerated domain actions worth auditing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    UnitCreated,
    UnitUpdated,
    UnitDeleted,
    BookingCreated,
    BookingConfirmed,
    BookingCancelled,
    BookingExpired,
    BookingCompleted,
    PaymentCreated,
    PaymentStatusUpdated,
    PaymentCompleted,
    PaymentRefunded,
    PaymentCancelled,
}

impl EventType {
    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnitCreated => "UNIT_CREATED",
            Self::UnitUpdated => "UNIT_UPDATED",
            Self::UnitDeleted => "UNIT_DELETED",
            Self::BookingCreated => "BOOKING_CREATED",
            Self::BookingConfirmed => "BOOKING_CONFIRMED",
            Self::BookingCancelled => "BOOKING_CANCELLED",
            Self::BookingExpired => "BOOKING_EXPIRED",
            Self::BookingCompleted => "BOOKING_COMPLETED",
            Self::PaymentCreated => "PAYMENT_CREATED",
            Self::PaymentStatusUpdated => "PAYMENT_STATUS_UPDATED",
            Self::PaymentCompleted => "PAYMENT_COMPLETED",
            Self::PaymentRefunded => "PAYMENT_REFUNDED",
            Self::PaymentCancelled => "PAYMENT_CANCELLED",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A not-yet-persisted audit event.
///
/// Services stamp `occurred_at` from their injected clock so adapters stay
/// clock-free; the recorder assigns the row identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDomainEvent {
    pub event_type: EventType,
    pub user_id: Uuid,
    pub entity_id: Option<Uuid>,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

impl NewDomainEvent {
    /// Build an event referencing one entity.
    pub fn for_entity(
        event_type: EventType,
        user_id: Uuid,
        entity_id: Uuid,
        description: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_type,
            user_id,
            entity_id: Some(entity_id),
            description: description.into(),
            occurred_at,
        }
    }
}
