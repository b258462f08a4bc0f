//! Unit management and search service.
//!
//! Unit CRUD is thin next to the lifecycle engine, but every mutation here
//! still invalidates the availability cache and records an audit event; the
//! available-units count is served read-through from the cache.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    AvailabilityCache, BookingRepository, BookingRepositoryError, CreateUnitRequest,
    DeleteUnitRequest, EventRecorder, SearchUnitsRequest, UnitCommand, UnitPayload, UnitQuery,
    UnitRepository, UnitRepositoryError, UpdateUnitRequest,
};
use crate::domain::{BookingPolicy, Error, EventType, NewDomainEvent, Unit, UnitSnapshot};

use pagination::Page;

fn map_unit_repo_error(error: UnitRepositoryError) -> Error {
    match error {
        UnitRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("unit repository unavailable: {message}"))
        }
        UnitRepositoryError::Query { message } => {
            Error::internal(format!("unit repository error: {message}"))
        }
    }
}

fn map_booking_repo_error(error: BookingRepositoryError) -> Error {
    match error {
        BookingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("booking repository unavailable: {message}"))
        }
        other => Error::internal(format!("booking repository error: {other}")),
    }
}

/// Service implementing the unit command and query ports.
#[derive(Clone)]
pub struct UnitService<U, B, E, C> {
    unit_repo: Arc<U>,
    booking_repo: Arc<B>,
    event_recorder: Arc<E>,
    availability_cache: Arc<C>,
    clock: Arc<dyn Clock>,
    policy: BookingPolicy,
}

impl<U, B, E, C> UnitService<U, B, E, C> {
    /// Create a new unit service.
    pub fn new(
        unit_repo: Arc<U>,
        booking_repo: Arc<B>,
        event_recorder: Arc<E>,
        availability_cache: Arc<C>,
        clock: Arc<dyn Clock>,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            unit_repo,
            booking_repo,
            event_recorder,
            availability_cache,
            clock,
            policy,
        }
    }
}

impl<U, B, E, C> UnitService<U, B, E, C>
where
    U: UnitRepository,
    B: BookingRepository,
    E: EventRecorder,
    C: AvailabilityCache,
{
    async fn record_event(&self, event: NewDomainEvent) {
        if let Err(error) = self.event_recorder.record(event).await {
            warn!(%error, "audit event write failed");
        }
    }

    async fn invalidate_availability(&self) {
        if let Err(error) = self.availability_cache.invalidate().await {
            warn!(%error, "availability cache invalidation failed");
        }
    }

    async fn load_unit(&self, unit_id: Uuid) -> Result<Unit, Error> {
        self.unit_repo
            .find_by_id(unit_id)
            .await
            .map_err(map_unit_repo_error)?
            .ok_or_else(|| Error::not_found(format!("unit {unit_id} not found")))
    }
}

#[async_trait]
impl<U, B, E, C> UnitCommand for UnitService<U, B, E, C>
where
    U: UnitRepository,
    B: BookingRepository,
    E: EventRecorder,
    C: AvailabilityCache,
{
    async fn create_unit(&self, request: CreateUnitRequest) -> Result<UnitPayload, Error> {
        let now = self.clock.utc();
        let draft = request.draft;

        let unit = Unit::new(UnitSnapshot {
            id: Uuid::new_v4(),
            number_of_rooms: draft.number_of_rooms,
            accommodation_type: draft.accommodation_type,
            floor: draft.floor,
            base_price: draft.base_price,
            total_price: self.policy.quote_total_price(draft.base_price),
            description: draft.description,
            available: true,
            created_at: now,
            updated_at: now,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.unit_repo
            .save(&unit)
            .await
            .map_err(map_unit_repo_error)?;
        self.invalidate_availability().await;

        self.record_event(NewDomainEvent::for_entity(
            EventType::UnitCreated,
            request.user_id,
            unit.id(),
            format!("Unit created: {}", unit.id()),
            now,
        ))
        .await;

        info!(unit_id = %unit.id(), user_id = %request.user_id, "unit created");
        Ok(UnitPayload::from(unit))
    }

    async fn update_unit(&self, request: UpdateUnitRequest) -> Result<UnitPayload, Error> {
        let now = self.clock.utc();
        let existing = self.load_unit(request.unit_id).await?;
        let draft = request.draft;

        let updated = Unit::new(UnitSnapshot {
            id: existing.id(),
            number_of_rooms: draft.number_of_rooms,
            accommodation_type: draft.accommodation_type,
            floor: draft.floor,
            base_price: draft.base_price,
            total_price: self.policy.quote_total_price(draft.base_price),
            description: draft.description,
            available: existing.available(),
            created_at: existing.created_at(),
            updated_at: now,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.unit_repo
            .save(&updated)
            .await
            .map_err(map_unit_repo_error)?;
        self.invalidate_availability().await;

        self.record_event(NewDomainEvent::for_entity(
            EventType::UnitUpdated,
            request.user_id,
            updated.id(),
            format!("Unit updated: {}", updated.id()),
            now,
        ))
        .await;

        info!(unit_id = %updated.id(), user_id = %request.user_id, "unit updated");
        Ok(UnitPayload::from(updated))
    }

    async fn delete_unit(&self, request: DeleteUnitRequest) -> Result<(), Error> {
        let now = self.clock.utc();
        let unit = self.load_unit(request.unit_id).await?;

        let referenced = self
            .booking_repo
            .exists_active_for_unit(unit.id())
            .await
            .map_err(map_booking_repo_error)?;
        if referenced {
            return Err(Error::conflict(format!(
                "unit {} is referenced by an active booking",
                unit.id()
            )));
        }

        self.unit_repo
            .delete(unit.id())
            .await
            .map_err(map_unit_repo_error)?;
        self.invalidate_availability().await;

        self.record_event(NewDomainEvent::for_entity(
            EventType::UnitDeleted,
            request.user_id,
            unit.id(),
            format!("Unit deleted: {}", unit.id()),
            now,
        ))
        .await;

        info!(unit_id = %unit.id(), user_id = %request.user_id, "unit deleted");
        Ok(())
    }
}

#[async_trait]
impl<U, B, E, C> UnitQuery for UnitService<U, B, E, C>
where
    U: UnitRepository,
    B: BookingRepository,
    E: EventRecorder,
    C: AvailabilityCache,
{
    async fn get_unit(&self, unit_id: Uuid) -> Result<UnitPayload, Error> {
        let unit = self.load_unit(unit_id).await?;
        Ok(UnitPayload::from(unit))
    }

    async fn search_units(&self, request: SearchUnitsRequest) -> Result<Page<UnitPayload>, Error> {
        let units = self
            .unit_repo
            .search(&request.filter, request.page)
            .await
            .map_err(map_unit_repo_error)?;
        Ok(units.map(UnitPayload::from))
    }

    async fn available_units_count(&self) -> Result<u64, Error> {
        match self.availability_cache.get_count().await {
            Ok(Some(count)) => return Ok(count),
            Ok(None) => {}
            Err(error) => {
                warn!(%error, "availability cache read failed, counting from the unit store");
            }
        }

        let count = self
            .unit_repo
            .count_available()
            .await
            .map_err(map_unit_repo_error)?;
        if let Err(error) = self.availability_cache.put_count(count).await {
            warn!(%error, "availability cache write-back failed");
        }
        info!(count, "available-units count recomputed from the unit store");
        Ok(count)
    }
}

#[cfg(test)]
#[path = "unit_service_tests.rs"]
mod tests;
