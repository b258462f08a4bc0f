//! PostgreSQL-backed `PaymentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{PaymentRepository, PaymentRepositoryError};
use crate::domain::{Payment, PaymentMethod, PaymentSnapshot, PaymentStatus};

use super::diesel_error_mapping::{map_diesel_error_with, map_pool_error_with};
use super::models::{NewPaymentRow, PaymentRow, PaymentTransition};
use super::pool::{DbPool, PoolError};
use super::schema::payments;

/// Diesel-backed implementation of the payment repository port.
#[derive(Clone)]
pub struct DieselPaymentRepository {
    pool: DbPool,
}

impl DieselPaymentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PaymentRepositoryError {
    map_pool_error_with(error, PaymentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PaymentRepositoryError {
    map_diesel_error_with(
        error,
        PaymentRepositoryError::query,
        PaymentRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain payment.
fn row_to_payment(row: PaymentRow) -> Result<Payment, PaymentRepositoryError> {
    let PaymentRow {
        id,
        booking_id,
        amount,
        status,
        payment_method,
        transaction_id,
        created_at,
        updated_at,
    } = row;

    let status: PaymentStatus = status
        .parse()
        .map_err(|err: crate::domain::PaymentValidationError| {
            PaymentRepositoryError::query(err.to_string())
        })?;
    let method: PaymentMethod = payment_method
        .parse()
        .map_err(|err: crate::domain::PaymentValidationError| {
            PaymentRepositoryError::query(err.to_string())
        })?;

    Payment::new(PaymentSnapshot {
        id,
        booking_id,
        amount,
        status,
        method,
        transaction_id,
        created_at,
        updated_at,
    })
    .map_err(|err| PaymentRepositoryError::query(err.to_string()))
}

#[async_trait]
impl PaymentRepository for DieselPaymentRepository {
    async fn find_by_id(
        &self,
        payment_id: Uuid,
    ) -> Result<Option<Payment>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = payments::table
            .find(payment_id)
            .select(PaymentRow::as_select())
            .first::<PaymentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_payment).transpose()
    }

    async fn save(&self, payment: &Payment) -> Result<(), PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewPaymentRow {
            id: payment.id(),
            booking_id: payment.booking_id(),
            amount: payment.amount(),
            status: payment.status().as_str(),
            payment_method: payment.method().as_str(),
            transaction_id: payment.transaction_id(),
            created_at: payment.created_at(),
            updated_at: payment.updated_at(),
        };
        let update_row = PaymentTransition {
            status: payment.status().as_str(),
            updated_at: payment.updated_at(),
        };

        diesel::insert_into(payments::table)
            .values(&new_row)
            .on_conflict(payments::id)
            .do_update()
            .set(&update_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<PaymentRow> = payments::table
            .filter(payments::booking_id.eq(booking_id))
            .order(payments::created_at.asc())
            .select(PaymentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_payment).collect()
    }

    async fn find_by_booking_and_status(
        &self,
        booking_id: Uuid,
        status: PaymentStatus,
    ) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<PaymentRow> = payments::table
            .filter(payments::booking_id.eq(booking_id))
            .filter(payments::status.eq(status.as_str()))
            .order(payments::created_at.asc())
            .select(PaymentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_payment).collect()
    }
}
