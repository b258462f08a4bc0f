//! Application wiring: configuration, service construction, scheduling.

pub mod config;
pub mod scheduler;

use std::sync::Arc;

use mockable::Clock;

use crate::domain::{
    AvailabilityReconciler, BookingLifecycleService, BookingPolicy, PaymentService, UnitService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::cache::RedisAvailabilityCache;
use crate::outbound::persistence::{
    DbPool, DieselBookingRepository, DieselEventRecorder, DieselPaymentRepository,
    DieselUnitRepository,
};

/// The production lifecycle engine over the Diesel and Redis adapters.
pub type Engine = BookingLifecycleService<
    DieselBookingRepository,
    DieselUnitRepository,
    DieselEventRecorder,
    RedisAvailabilityCache,
>;

/// The production cache reconciler.
pub type Reconciler = AvailabilityReconciler<DieselUnitRepository, RedisAvailabilityCache>;

/// Everything `main` needs after wiring.
pub struct AppServices {
    pub http_state: HttpState,
    pub engine: Arc<Engine>,
    pub reconciler: Arc<Reconciler>,
}

/// Construct the domain services over their production adapters.
pub fn build_services(
    pool: DbPool,
    cache: RedisAvailabilityCache,
    clock: Arc<dyn Clock>,
    policy: BookingPolicy,
) -> AppServices {
    let booking_repo = Arc::new(DieselBookingRepository::new(pool.clone()));
    let unit_repo = Arc::new(DieselUnitRepository::new(pool.clone()));
    let payment_repo = Arc::new(DieselPaymentRepository::new(pool.clone()));
    let event_recorder = Arc::new(DieselEventRecorder::new(pool));
    let cache = Arc::new(cache);

    let engine = Arc::new(BookingLifecycleService::new(
        Arc::clone(&booking_repo),
        Arc::clone(&unit_repo),
        Arc::clone(&event_recorder),
        Arc::clone(&cache),
        Arc::clone(&clock),
        policy,
    ));
    let unit_service = Arc::new(UnitService::new(
        Arc::clone(&unit_repo),
        Arc::clone(&booking_repo),
        Arc::clone(&event_recorder),
        Arc::clone(&cache),
        Arc::clone(&clock),
        policy,
    ));
    let payment_service = Arc::new(PaymentService::new(
        payment_repo,
        booking_repo,
        event_recorder,
        clock,
    ));
    let reconciler = Arc::new(AvailabilityReconciler::new(unit_repo, cache));

    let http_state = HttpState::new(
        engine.clone(),
        engine.clone(),
        unit_service.clone(),
        unit_service,
        payment_service.clone(),
        payment_service,
    );

    AppServices {
        http_state,
        engine,
        reconciler,
    }
}
