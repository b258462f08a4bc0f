//! Accommodation unit entity.
//!
//! A unit is a bookable accommodation with a price and room/floor
//! attributes. Its `available` flag is denormalized state owned by the
//! booking lifecycle engine: true iff no booking in
//! {PENDING_PAYMENT, CONFIRMED} currently overlaps any date range for the
//! unit.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Accommodation category of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccommodationType {
    Home,
    Flat,
    Apartments,
}

impl AccommodationType {
    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "HOME",
            Self::Flat => "FLAT",
            Self::Apartments => "APARTMENTS",
        }
    }
}

impl std::fmt::Display for AccommodationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccommodationType {
    type Err = UnitValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "HOME" => Ok(Self::Home),
            "FLAT" => Ok(Self::Flat),
            "APARTMENTS" => Ok(Self::Apartments),
            other => Err(UnitValidationError::UnknownAccommodationType {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validation failures for unit construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitValidationError {
    #[error("number of rooms must be at least 1, got {value}")]
    NonPositiveRooms { value: i32 },
    #[error("base price must be positive, got {value}")]
    NonPositiveBasePrice { value: Decimal },
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("unknown accommodation type: {value}")]
    UnknownAccommodationType { value: String },
}

/// Full state needed to (re)construct a [`Unit`].
#[derive(Debug, Clone)]
pub struct UnitSnapshot {
    pub id: Uuid,
    pub number_of_rooms: i32,
    pub accommodation_type: AccommodationType,
    pub floor: i32,
    pub base_price: Decimal,
    pub total_price: Decimal,
    pub description: String,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A bookable accommodation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    id: Uuid,
    number_of_rooms: i32,
    accommodation_type: AccommodationType,
    floor: i32,
    base_price: Decimal,
    total_price: Decimal,
    description: String,
    available: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Unit {
    /// Create a validated unit from a snapshot.
    pub fn new(snapshot: UnitSnapshot) -> Result<Self, UnitValidationError> {
        if snapshot.number_of_rooms < 1 {
            return Err(UnitValidationError::NonPositiveRooms {
                value: snapshot.number_of_rooms,
            });
        }
        if snapshot.base_price <= Decimal::ZERO {
            return Err(UnitValidationError::NonPositiveBasePrice {
                value: snapshot.base_price,
            });
        }
        if snapshot.description.trim().is_empty() {
            return Err(UnitValidationError::EmptyDescription);
        }
        Ok(Self {
            id: snapshot.id,
            number_of_rooms: snapshot.number_of_rooms,
            accommodation_type: snapshot.accommodation_type,
            floor: snapshot.floor,
            base_price: snapshot.base_price,
            total_price: snapshot.total_price,
            description: snapshot.description,
            available: snapshot.available,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn number_of_rooms(&self) -> i32 {
        self.number_of_rooms
    }

    pub fn accommodation_type(&self) -> AccommodationType {
        self.accommodation_type
    }

    pub fn floor(&self) -> i32 {
        self.floor
    }

    /// Price before the system markup.
    pub fn base_price(&self) -> Decimal {
        self.base_price
    }

    /// Advertised price including the system markup.
    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Whether the unit can accept a new booking right now.
    pub fn available(&self) -> bool {
        self.available
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
