//! Backend entry-point: wires REST endpoints, background sweeps, and
//! OpenAPI docs.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use staybook_backend::ApiDoc;
use staybook_backend::Trace;
use staybook_backend::inbound::http::health::{HealthState, live, ready};
use staybook_backend::inbound::http::{bookings, payments, units};
use staybook_backend::outbound::cache::RedisAvailabilityCache;
use staybook_backend::outbound::persistence::{DbPool, PoolConfig};
use staybook_backend::server::config::AppConfig;
use staybook_backend::server::{build_services, scheduler};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(&config.database_url))
        .await
        .map_err(|err| std::io::Error::other(format!("database pool: {err}")))?;
    let cache = RedisAvailabilityCache::connect(&config.redis_url, 4)
        .await
        .map_err(|err| std::io::Error::other(format!("redis cache: {err}")))?;

    let services = build_services(pool, cache, Arc::new(DefaultClock), config.policy);
    let tasks = scheduler::spawn_background_tasks(
        Arc::clone(&services.engine),
        Arc::clone(&services.reconciler),
        config.sweeps,
    );

    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(services.http_state);

    let server = HttpServer::new(move || {
        let api = web::scope("/api/v1")
            .service(bookings::create_booking)
            .service(bookings::list_user_bookings)
            .service(bookings::get_booking)
            .service(bookings::confirm_booking)
            .service(bookings::cancel_booking)
            .service(units::create_unit)
            .service(units::search_units)
            .service(units::available_units_count)
            .service(units::get_unit)
            .service(units::update_unit)
            .service(units::delete_unit)
            .service(payments::create_payment)
            .service(payments::get_payment)
            .service(payments::process_payment)
            .service(payments::refund_payment)
            .service(payments::update_payment_status)
            .service(payments::cancel_pending_payments)
            .service(payments::list_booking_payments);

        let app = App::new()
            .app_data(http_state.clone())
            .app_data(server_health_state.clone())
            .wrap(Trace)
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    info!(addr = %config.bind_addr, "staybook backend listening");

    let result = server.run().await;
    for task in tasks {
        task.abort();
    }
    result
}
