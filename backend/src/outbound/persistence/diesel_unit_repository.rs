//! PostgreSQL-backed `UnitRepository` implementation using Diesel ORM.
//!
//! Search applies the optional attribute filters plus, when a date window
//! is given, a subquery excluding units held by an active booking under
//! the same inclusive-boundary overlap predicate the booking adapter
//! enforces.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::ports::{UnitRepository, UnitRepositoryError, UnitSearchFilter};
use crate::domain::{AccommodationType, BookingStatus, Unit, UnitSnapshot};

use super::diesel_error_mapping::{map_diesel_error_with, map_pool_error_with};
use super::models::{NewUnitRow, UnitRow, UnitUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{bookings, units};

/// Diesel-backed implementation of the unit repository port.
#[derive(Clone)]
pub struct DieselUnitRepository {
    pool: DbPool,
}

impl DieselUnitRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> UnitRepositoryError {
    map_pool_error_with(error, UnitRepositoryError::connection)
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> UnitRepositoryError {
    map_diesel_error_with(
        error,
        UnitRepositoryError::query,
        UnitRepositoryError::connection,
    )
}

fn active_statuses() -> Vec<&'static str> {
    BookingStatus::ACTIVE
        .iter()
        .map(|status| status.as_str())
        .collect()
}

/// Convert a database row into a validated domain unit.
fn row_to_unit(row: UnitRow) -> Result<Unit, UnitRepositoryError> {
    let UnitRow {
        id,
        number_of_rooms,
        accommodation_type,
        floor,
        base_price,
        total_price,
        description,
        available,
        created_at,
        updated_at,
    } = row;

    let accommodation_type: AccommodationType = accommodation_type
        .parse()
        .map_err(|err: crate::domain::UnitValidationError| {
            UnitRepositoryError::query(err.to_string())
        })?;

    Unit::new(UnitSnapshot {
        id,
        number_of_rooms,
        accommodation_type,
        floor,
        base_price,
        total_price,
        description,
        available,
        created_at,
        updated_at,
    })
    .map_err(|err| UnitRepositoryError::query(err.to_string()))
}

/// Build the filtered, available-only search query. Called once for the
/// count and once for the page because boxed queries are single-use.
fn filtered_units<'a>(
    filter: &'a UnitSearchFilter,
) -> units::BoxedQuery<'a, diesel::pg::Pg> {
    let mut query = units::table.into_boxed().filter(units::available.eq(true));

    if let Some(rooms) = filter.number_of_rooms {
        query = query.filter(units::number_of_rooms.eq(rooms));
    }
    if let Some(kind) = filter.accommodation_type {
        query = query.filter(units::accommodation_type.eq(kind.as_str()));
    }
    if let Some(floor) = filter.floor {
        query = query.filter(units::floor.eq(floor));
    }
    if let Some(min_price) = filter.min_price {
        query = query.filter(units::total_price.ge(min_price));
    }
    if let Some(max_price) = filter.max_price {
        query = query.filter(units::total_price.le(max_price));
    }
    if let (Some(check_in), Some(check_out)) = (filter.check_in, filter.check_out) {
        let held_units = bookings::table
            .filter(bookings::status.eq_any(active_statuses()))
            .filter(bookings::check_in_date.le(check_out))
            .filter(bookings::check_out_date.ge(check_in))
            .select(bookings::unit_id);
        query = query.filter(diesel::dsl::not(units::id.eq_any(held_units)));
    }

    query
}

#[async_trait]
impl UnitRepository for DieselUnitRepository {
    async fn find_by_id(&self, unit_id: Uuid) -> Result<Option<Unit>, UnitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = units::table
            .find(unit_id)
            .select(UnitRow::as_select())
            .first::<UnitRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_unit).transpose()
    }

    async fn save(&self, unit: &Unit) -> Result<(), UnitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUnitRow {
            id: unit.id(),
            number_of_rooms: unit.number_of_rooms(),
            accommodation_type: unit.accommodation_type().as_str(),
            floor: unit.floor(),
            base_price: unit.base_price(),
            total_price: unit.total_price(),
            description: unit.description(),
            available: unit.available(),
            created_at: unit.created_at(),
            updated_at: unit.updated_at(),
        };
        let update_row = UnitUpdate {
            number_of_rooms: unit.number_of_rooms(),
            accommodation_type: unit.accommodation_type().as_str(),
            floor: unit.floor(),
            base_price: unit.base_price(),
            total_price: unit.total_price(),
            description: unit.description(),
            available: unit.available(),
            updated_at: unit.updated_at(),
        };

        diesel::insert_into(units::table)
            .values(&new_row)
            .on_conflict(units::id)
            .do_update()
            .set(&update_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, unit_id: Uuid) -> Result<(), UnitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(units::table.find(unit_id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if deleted == 0 {
            return Err(UnitRepositoryError::query("unit not found"));
        }
        Ok(())
    }

    async fn search(
        &self,
        filter: &UnitSearchFilter,
        page: PageRequest,
    ) -> Result<Page<Unit>, UnitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = filtered_units(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<UnitRow> = filtered_units(filter)
            .order((units::created_at.desc(), units::id.desc()))
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let units = rows
            .into_iter()
            .map(row_to_unit)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(units, page, u64::try_from(total).unwrap_or(0)))
    }

    async fn count_available(&self) -> Result<u64, UnitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = units::table
            .filter(units::available.eq(true))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}
