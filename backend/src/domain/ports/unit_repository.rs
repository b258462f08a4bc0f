//! Port for unit persistence and availability counting.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{AccommodationType, Unit};

/// Errors raised by unit repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitRepositoryError {
    /// Repository connection could not be established.
    #[error("unit repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("unit repository query failed: {message}")]
    Query { message: String },
}

impl UnitRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Optional criteria for unit search. All filters combine with AND; the
/// date pair additionally excludes units with an active booking that
/// overlaps the requested window (inclusive boundaries on both ends).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitSearchFilter {
    pub number_of_rooms: Option<i32>,
    pub accommodation_type: Option<AccommodationType>,
    pub floor: Option<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
}

/// Port for reading and writing units.
///
/// `save` is an upsert keyed on the unit id; the availability flag is only
/// ever flipped by the booking repository's transactional operations, never
/// through this port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnitRepository: Send + Sync {
    /// Find a unit by id.
    async fn find_by_id(&self, unit_id: Uuid) -> Result<Option<Unit>, UnitRepositoryError>;

    /// Insert or update a unit.
    async fn save(&self, unit: &Unit) -> Result<(), UnitRepositoryError>;

    /// Delete a unit by id.
    async fn delete(&self, unit_id: Uuid) -> Result<(), UnitRepositoryError>;

    /// Page through available units matching the filter.
    async fn search(
        &self,
        filter: &UnitSearchFilter,
        page: PageRequest,
    ) -> Result<Page<Unit>, UnitRepositoryError>;

    /// Count units with `available == true`.
    async fn count_available(&self) -> Result<u64, UnitRepositoryError>;
}
