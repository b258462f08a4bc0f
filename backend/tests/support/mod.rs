//! In-memory adapters and a mutable clock for engine-level tests.
//!
//! The booking store and unit store share one mutex-guarded state so the
//! compound operations (`create_pending`, `save_releasing_unit`) are
//! genuinely atomic with respect to concurrent callers, mirroring the
//! transactional guarantees of the Diesel adapters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use pagination::{Page, PageRequest};
use uuid::Uuid;

use staybook_backend::domain::ports::{
    AvailabilityCache, AvailabilityCacheError, BookingRepository, BookingRepositoryError,
    EventRecorder, EventRecorderError, UnitRepository, UnitRepositoryError, UnitSearchFilter,
};
use staybook_backend::domain::{
    Booking, BookingStatus, NewDomainEvent, Unit, UnitSnapshot,
};

/// Clock whose current instant is set by the test and advanced explicitly.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: Duration) {
        let delta = TimeDelta::from_std(delta)
            .unwrap_or_else(|err| panic!("delta converts to TimeDelta: {err}"));
        *self.lock_clock() += delta;
    }

    pub fn advance_minutes(&self, minutes: i64) {
        *self.lock_clock() += TimeDelta::minutes(minutes);
    }

    pub fn advance_days(&self, days: i64) {
        *self.lock_clock() += TimeDelta::days(days);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// A fixed, readable instant for deterministic assertions.
pub fn fixed_instant() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .unwrap_or_else(|_| panic!("fixture timestamp parses"))
}

#[derive(Default)]
struct StoreState {
    units: HashMap<Uuid, Unit>,
    bookings: HashMap<Uuid, Booking>,
}

/// Shared unit + booking state behind one lock.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("store mutex"),
        }
    }

    pub fn seed_unit(&self, unit: Unit) {
        self.lock().units.insert(unit.id(), unit);
    }

    pub fn seed_booking(&self, booking: Booking) {
        self.lock().bookings.insert(booking.id(), booking);
    }

    pub fn unit(&self, unit_id: Uuid) -> Option<Unit> {
        self.lock().units.get(&unit_id).cloned()
    }

    pub fn booking(&self, booking_id: Uuid) -> Option<Booking> {
        self.lock().bookings.get(&booking_id).cloned()
    }

    pub fn active_bookings_for(&self, unit_id: Uuid) -> usize {
        self.lock()
            .bookings
            .values()
            .filter(|booking| booking.unit_id() == unit_id && booking.status().holds_unit())
            .count()
    }

    /// The core invariant: a unit is available iff no active booking holds
    /// it.
    pub fn assert_availability_invariant(&self) {
        let state = self.lock();
        for unit in state.units.values() {
            let held = state.bookings.values().any(|booking| {
                booking.unit_id() == unit.id() && booking.status().holds_unit()
            });
            assert_eq!(
                unit.available(),
                !held,
                "unit {} availability flag is out of sync with booking state",
                unit.id()
            );
        }
    }
}

fn with_availability(unit: &Unit, available: bool, now: DateTime<Utc>) -> Unit {
    Unit::new(UnitSnapshot {
        id: unit.id(),
        number_of_rooms: unit.number_of_rooms(),
        accommodation_type: unit.accommodation_type(),
        floor: unit.floor(),
        base_price: unit.base_price(),
        total_price: unit.total_price(),
        description: unit.description().to_owned(),
        available,
        created_at: unit.created_at(),
        updated_at: now,
    })
    .unwrap_or_else(|err| panic!("rebuilt unit stays valid: {err}"))
}

fn overlaps(
    booking: &Booking,
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
) -> bool {
    booking.check_in() <= check_out && booking.check_out() >= check_in
}

/// Unit repository over the shared store.
#[derive(Clone)]
pub struct InMemoryUnitRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryUnitRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UnitRepository for InMemoryUnitRepository {
    async fn find_by_id(&self, unit_id: Uuid) -> Result<Option<Unit>, UnitRepositoryError> {
        Ok(self.store.unit(unit_id))
    }

    async fn save(&self, unit: &Unit) -> Result<(), UnitRepositoryError> {
        self.store.seed_unit(unit.clone());
        Ok(())
    }

    async fn delete(&self, unit_id: Uuid) -> Result<(), UnitRepositoryError> {
        self.store.lock().units.remove(&unit_id);
        Ok(())
    }

    async fn search(
        &self,
        filter: &UnitSearchFilter,
        page: PageRequest,
    ) -> Result<Page<Unit>, UnitRepositoryError> {
        let state = self.store.lock();
        let mut matches: Vec<Unit> = state
            .units
            .values()
            .filter(|unit| unit.available())
            .filter(|unit| {
                filter
                    .number_of_rooms
                    .is_none_or(|rooms| unit.number_of_rooms() == rooms)
            })
            .filter(|unit| {
                filter
                    .accommodation_type
                    .is_none_or(|kind| unit.accommodation_type() == kind)
            })
            .filter(|unit| filter.floor.is_none_or(|floor| unit.floor() == floor))
            .filter(|unit| filter.min_price.is_none_or(|min| unit.total_price() >= min))
            .filter(|unit| filter.max_price.is_none_or(|max| unit.total_price() <= max))
            .filter(|unit| {
                let (Some(check_in), Some(check_out)) = (filter.check_in, filter.check_out)
                else {
                    return true;
                };
                !state.bookings.values().any(|booking| {
                    booking.unit_id() == unit.id()
                        && booking.status().holds_unit()
                        && overlaps(booking, check_in, check_out)
                })
            })
            .cloned()
            .collect();
        matches.sort_by_key(|unit| std::cmp::Reverse(unit.created_at()));

        let total = matches.len() as u64;
        let start = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let content: Vec<Unit> = matches
            .into_iter()
            .skip(start)
            .take(page.size() as usize)
            .collect();
        Ok(Page::new(content, page, total))
    }

    async fn count_available(&self) -> Result<u64, UnitRepositoryError> {
        Ok(self
            .store
            .lock()
            .units
            .values()
            .filter(|unit| unit.available())
            .count() as u64)
    }
}

/// Booking repository over the shared store; the compound operations hold
/// the one lock for their whole critical section.
#[derive(Clone)]
pub struct InMemoryBookingRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryBookingRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn find_by_id(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        Ok(self.store.booking(booking_id))
    }

    async fn create_pending(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        let mut state = self.store.lock();
        let unit_id = booking.unit_id();

        let Some(unit) = state.units.get(&unit_id).cloned() else {
            return Err(BookingRepositoryError::unit_not_found(unit_id));
        };
        if !unit.available() {
            return Err(BookingRepositoryError::unit_unavailable(unit_id));
        }
        let overlapping = state.bookings.values().any(|existing| {
            existing.unit_id() == unit_id
                && existing.status().holds_unit()
                && overlaps(existing, booking.check_in(), booking.check_out())
        });
        if overlapping {
            return Err(BookingRepositoryError::overlap(unit_id));
        }

        let held = with_availability(&unit, false, booking.created_at());
        state.units.insert(unit_id, held);
        state.bookings.insert(booking.id(), booking.clone());
        Ok(())
    }

    async fn save(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        let mut state = self.store.lock();
        if !state.bookings.contains_key(&booking.id()) {
            return Err(BookingRepositoryError::query("booking not found"));
        }
        state.bookings.insert(booking.id(), booking.clone());
        Ok(())
    }

    async fn save_releasing_unit(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        let mut state = self.store.lock();
        if !state.bookings.contains_key(&booking.id()) {
            return Err(BookingRepositoryError::query("booking not found"));
        }
        state.bookings.insert(booking.id(), booking.clone());

        if let Some(unit) = state.units.get(&booking.unit_id()).cloned() {
            let released = with_availability(&unit, true, booking.updated_at());
            state.units.insert(unit.id(), released);
        }
        Ok(())
    }

    async fn find_overlapping(
        &self,
        unit_id: Uuid,
        statuses: &[BookingStatus],
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        Ok(self
            .store
            .lock()
            .bookings
            .values()
            .filter(|booking| booking.unit_id() == unit_id)
            .filter(|booking| statuses.contains(&booking.status()))
            .filter(|booking| overlaps(booking, check_in, check_out))
            .cloned()
            .collect())
    }

    async fn find_by_status_and_deadline_before(
        &self,
        status: BookingStatus,
        instant: DateTime<Utc>,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        Ok(self
            .store
            .lock()
            .bookings
            .values()
            .filter(|booking| booking.status() == status)
            .filter(|booking| booking.payment_deadline() < instant)
            .cloned()
            .collect())
    }

    async fn find_by_status_and_checkout_before(
        &self,
        status: BookingStatus,
        instant: DateTime<Utc>,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        Ok(self
            .store
            .lock()
            .bookings
            .values()
            .filter(|booking| booking.status() == status)
            .filter(|booking| booking.check_out() <= instant)
            .cloned()
            .collect())
    }

    async fn find_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Booking>, BookingRepositoryError> {
        let mut matches: Vec<Booking> = self
            .store
            .lock()
            .bookings
            .values()
            .filter(|booking| booking.user_id() == user_id)
            .cloned()
            .collect();
        matches.sort_by_key(|booking| std::cmp::Reverse(booking.created_at()));

        let total = matches.len() as u64;
        let start = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let content: Vec<Booking> = matches
            .into_iter()
            .skip(start)
            .take(page.size() as usize)
            .collect();
        Ok(Page::new(content, page, total))
    }

    async fn exists_active_for_unit(
        &self,
        unit_id: Uuid,
    ) -> Result<bool, BookingRepositoryError> {
        Ok(self.store.active_bookings_for(unit_id) > 0)
    }
}

/// Event recorder keeping everything for assertions.
#[derive(Default)]
pub struct RecordingEventRecorder {
    events: Mutex<Vec<NewDomainEvent>>,
}

impl RecordingEventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<NewDomainEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => panic!("events mutex"),
        }
    }
}

#[async_trait]
impl EventRecorder for RecordingEventRecorder {
    async fn record(&self, event: NewDomainEvent) -> Result<(), EventRecorderError> {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event),
            Err(_) => panic!("events mutex"),
        }
        Ok(())
    }
}

/// Availability cache counting invalidations.
#[derive(Default)]
pub struct CountingAvailabilityCache {
    value: Mutex<Option<u64>>,
    invalidations: AtomicUsize,
}

impl CountingAvailabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, count: u64) {
        match self.value.lock() {
            Ok(mut guard) => *guard = Some(count),
            Err(_) => panic!("cache mutex"),
        }
    }

    pub fn cached(&self) -> Option<u64> {
        match self.value.lock() {
            Ok(guard) => *guard,
            Err(_) => panic!("cache mutex"),
        }
    }

    pub fn invalidations(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AvailabilityCache for CountingAvailabilityCache {
    async fn get_count(&self) -> Result<Option<u64>, AvailabilityCacheError> {
        Ok(self.cached())
    }

    async fn put_count(&self, count: u64) -> Result<(), AvailabilityCacheError> {
        self.seed(count);
        Ok(())
    }

    async fn invalidate(&self) -> Result<(), AvailabilityCacheError> {
        match self.value.lock() {
            Ok(mut guard) => *guard = None,
            Err(_) => panic!("cache mutex"),
        }
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
