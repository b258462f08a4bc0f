//! PostgreSQL-backed `EventRecorder` implementation using Diesel ORM.
//!
//! Appends audit rows to the `events` table. Row identity is assigned here;
//! the occurrence timestamp comes from the service's clock via the event
//! itself.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::NewDomainEvent;
use crate::domain::ports::{EventRecorder, EventRecorderError};

use super::models::NewEventRow;
use super::pool::{DbPool, PoolError};
use super::schema::events;

/// Diesel-backed implementation of the event recorder port.
#[derive(Clone)]
pub struct DieselEventRecorder {
    pool: DbPool,
}

impl DieselEventRecorder {
    /// Create a new recorder with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EventRecorderError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    EventRecorderError::connection(message)
}

#[async_trait]
impl EventRecorder for DieselEventRecorder {
    async fn record(&self, event: NewDomainEvent) -> Result<(), EventRecorderError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewEventRow {
            id: Uuid::new_v4(),
            user_id: event.user_id,
            event_type: event.event_type.as_str(),
            entity_id: event.entity_id,
            description: &event.description,
            created_at: event.occurred_at,
        };

        diesel::insert_into(events::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| EventRecorderError::write(err.to_string()))
    }
}
