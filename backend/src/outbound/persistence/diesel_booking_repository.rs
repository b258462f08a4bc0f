//! PostgreSQL-backed `BookingRepository` implementation using Diesel ORM.
//!
//! This adapter owns the two compound operations that couple a booking
//! write to its unit's availability flag. Both run inside one database
//! transaction; `create_pending` additionally takes a row-level lock on the
//! unit (`SELECT ... FOR UPDATE`) and re-checks availability and overlap
//! under that lock, so two concurrent creators targeting the same unit can
//! never both commit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::ports::{BookingRepository, BookingRepositoryError};
use crate::domain::{Booking, BookingSnapshot, BookingStatus};

use super::diesel_error_mapping::{map_diesel_error_with, map_pool_error_with};
use super::models::{BookingRow, BookingTransition, NewBookingRow};
use super::pool::{DbPool, PoolError};
use super::schema::{bookings, units};

/// Diesel-backed implementation of the booking repository port.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> BookingRepositoryError {
    map_pool_error_with(error, BookingRepositoryError::connection)
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> BookingRepositoryError {
    map_diesel_error_with(
        error,
        BookingRepositoryError::query,
        BookingRepositoryError::connection,
    )
}

/// Transaction-internal error: either a Diesel failure (rolls back and maps
/// generically) or a domain condition detected under the lock (rolls back
/// and surfaces as-is).
enum TxError {
    Diesel(diesel::result::Error),
    Abort(BookingRepositoryError),
}

impl From<diesel::result::Error> for TxError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

fn unwrap_tx_error(error: TxError) -> BookingRepositoryError {
    match error {
        TxError::Diesel(inner) => map_diesel_error(inner),
        TxError::Abort(inner) => inner,
    }
}

fn active_statuses() -> Vec<&'static str> {
    BookingStatus::ACTIVE
        .iter()
        .map(|status| status.as_str())
        .collect()
}

/// Convert a database row into a validated domain booking.
fn row_to_booking(row: BookingRow) -> Result<Booking, BookingRepositoryError> {
    let BookingRow {
        id,
        unit_id,
        user_id,
        check_in_date,
        check_out_date,
        total_price,
        status,
        payment_deadline,
        created_at,
        updated_at,
    } = row;

    let status: BookingStatus = status
        .parse()
        .map_err(|err: crate::domain::BookingValidationError| {
            BookingRepositoryError::query(err.to_string())
        })?;

    Booking::new(BookingSnapshot {
        id,
        unit_id,
        user_id,
        check_in: check_in_date,
        check_out: check_out_date,
        total_price,
        status,
        payment_deadline,
        created_at,
        updated_at,
    })
    .map_err(|err| BookingRepositoryError::query(err.to_string()))
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn find_by_id(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = bookings::table
            .find(booking_id)
            .select(BookingRow::as_select())
            .first::<BookingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_booking).transpose()
    }

    async fn create_pending(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let unit_id = booking.unit_id();

        conn.transaction::<_, TxError, _>(|conn| {
            async move {
                // Row-level exclusivity: the unit row is locked for the
                // remainder of the transaction, serializing concurrent
                // creators on this unit.
                let available = units::table
                    .find(unit_id)
                    .select(units::available)
                    .for_update()
                    .first::<bool>(conn)
                    .await
                    .optional()?;

                let Some(available) = available else {
                    return Err(TxError::Abort(BookingRepositoryError::unit_not_found(
                        unit_id,
                    )));
                };
                if !available {
                    return Err(TxError::Abort(BookingRepositoryError::unit_unavailable(
                        unit_id,
                    )));
                }

                // Overlap re-check under the lock, inclusive on both
                // boundaries.
                let overlapping: i64 = bookings::table
                    .filter(bookings::unit_id.eq(unit_id))
                    .filter(bookings::status.eq_any(active_statuses()))
                    .filter(bookings::check_in_date.le(booking.check_out()))
                    .filter(bookings::check_out_date.ge(booking.check_in()))
                    .count()
                    .get_result(conn)
                    .await?;
                if overlapping > 0 {
                    return Err(TxError::Abort(BookingRepositoryError::overlap(unit_id)));
                }

                // Unit write precedes the booking write for audit ordering.
                diesel::update(units::table.find(unit_id))
                    .set((
                        units::available.eq(false),
                        units::updated_at.eq(booking.created_at()),
                    ))
                    .execute(conn)
                    .await?;

                let row = NewBookingRow {
                    id: booking.id(),
                    unit_id,
                    user_id: booking.user_id(),
                    check_in_date: booking.check_in(),
                    check_out_date: booking.check_out(),
                    total_price: booking.total_price(),
                    status: booking.status().as_str(),
                    payment_deadline: booking.payment_deadline(),
                    created_at: booking.created_at(),
                    updated_at: booking.updated_at(),
                };
                diesel::insert_into(bookings::table)
                    .values(&row)
                    .execute(conn)
                    .await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(unwrap_tx_error)
    }

    async fn save(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(bookings::table.find(booking.id()))
            .set(&BookingTransition {
                status: booking.status().as_str(),
                updated_at: booking.updated_at(),
            })
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(BookingRepositoryError::query("booking not found"));
        }
        Ok(())
    }

    async fn save_releasing_unit(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let unit_id = booking.unit_id();

        conn.transaction::<_, TxError, _>(|conn| {
            async move {
                let updated = diesel::update(bookings::table.find(booking.id()))
                    .set(&BookingTransition {
                        status: booking.status().as_str(),
                        updated_at: booking.updated_at(),
                    })
                    .execute(conn)
                    .await?;
                if updated == 0 {
                    return Err(TxError::Abort(BookingRepositoryError::query(
                        "booking not found",
                    )));
                }

                diesel::update(units::table.find(unit_id))
                    .set((
                        units::available.eq(true),
                        units::updated_at.eq(booking.updated_at()),
                    ))
                    .execute(conn)
                    .await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(unwrap_tx_error)
    }

    async fn find_overlapping(
        &self,
        unit_id: Uuid,
        statuses: &[BookingStatus],
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let statuses: Vec<&str> = statuses.iter().map(|status| status.as_str()).collect();

        let rows: Vec<BookingRow> = bookings::table
            .filter(bookings::unit_id.eq(unit_id))
            .filter(bookings::status.eq_any(statuses))
            .filter(bookings::check_in_date.le(check_out))
            .filter(bookings::check_out_date.ge(check_in))
            .select(BookingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_booking).collect()
    }

    async fn find_by_status_and_deadline_before(
        &self,
        status: BookingStatus,
        instant: DateTime<Utc>,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BookingRow> = bookings::table
            .filter(bookings::status.eq(status.as_str()))
            .filter(bookings::payment_deadline.lt(instant))
            .select(BookingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_booking).collect()
    }

    async fn find_by_status_and_checkout_before(
        &self,
        status: BookingStatus,
        instant: DateTime<Utc>,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BookingRow> = bookings::table
            .filter(bookings::status.eq(status.as_str()))
            .filter(bookings::check_out_date.le(instant))
            .select(BookingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_booking).collect()
    }

    async fn find_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = bookings::table
            .filter(bookings::user_id.eq(user_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<BookingRow> = bookings::table
            .filter(bookings::user_id.eq(user_id))
            .order((bookings::created_at.desc(), bookings::id.desc()))
            .select(BookingRow::as_select())
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let bookings = rows
            .into_iter()
            .map(row_to_booking)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(
            bookings,
            page,
            u64::try_from(total).unwrap_or(0),
        ))
    }

    async fn exists_active_for_unit(
        &self,
        unit_id: Uuid,
    ) -> Result<bool, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            bookings::table
                .filter(bookings::unit_id.eq(unit_id))
                .filter(bookings::status.eq_any(active_statuses())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }
}
