//! Driving ports for unit management and search.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AccommodationType, Error, Unit};

use super::unit_repository::UnitSearchFilter;

/// Serializable unit projection returned by the driving ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitPayload {
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

impl From<Unit> for UnitPayload {
    fn from(value: Unit) -> Self {
        Self {
            id: value.id(),
            number_of_rooms: value.number_of_rooms(),
            accommodation_type: value.accommodation_type(),
            floor: value.floor(),
            base_price: value.base_price(),
            total_price: value.total_price(),
            description: value.description().to_owned(),
            available: value.available(),
            created_at: value.created_at(),
            updated_at: value.updated_at(),
        }
    }
}

/// Caller-supplied unit attributes for create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDraft {
    pub number_of_rooms: i32,
    pub accommodation_type: AccommodationType,
    pub floor: i32,
    pub base_price: Decimal,
    pub description: String,
}

/// Request to create a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateUnitRequest {
    pub draft: UnitDraft,
    pub user_id: Uuid,
}

/// Request to update a unit's attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateUnitRequest {
    pub unit_id: Uuid,
    pub draft: UnitDraft,
    pub user_id: Uuid,
}

/// Request to delete a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteUnitRequest {
    pub unit_id: Uuid,
    pub user_id: Uuid,
}

/// Request to search units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchUnitsRequest {
    pub filter: UnitSearchFilter,
    pub page: PageRequest,
}

/// Driving port for unit mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnitCommand: Send + Sync {
    /// Create an available unit; its advertised total price is quoted with
    /// the system markup.
    async fn create_unit(&self, request: CreateUnitRequest) -> Result<UnitPayload, Error>;

    /// Update a unit's attributes and requote its total price.
    async fn update_unit(&self, request: UpdateUnitRequest) -> Result<UnitPayload, Error>;

    /// Delete a unit that no active booking references.
    async fn delete_unit(&self, request: DeleteUnitRequest) -> Result<(), Error>;
}

/// Driving port for unit reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnitQuery: Send + Sync {
    /// Fetch a unit by id.
    async fn get_unit(&self, unit_id: Uuid) -> Result<UnitPayload, Error>;

    /// Page through available units matching the filter.
    async fn search_units(&self, request: SearchUnitsRequest) -> Result<Page<UnitPayload>, Error>;

    /// Count of currently available units, served through the cache.
    async fn available_units_count(&self) -> Result<u64, Error>;
}
