//! Background sweep scheduler.
//!
//! Three fixed-interval tasks run independently of request traffic: the
//! expiry sweep, the completion sweep, and the availability-cache
//! reconciliation. Intervals tick immediately on spawn, so the cache is
//! warmed at startup and overdue bookings are swept without waiting a full
//! period.
//!
//! The payment deadline is data-level state enforced only by the sweep's
//! periodic re-evaluation: a booking can overshoot its deadline by up to
//! one expiry interval before it is cancelled. That bound is accepted and
//! tuned via `BOOKING_EXPIRY_SWEEP_SECONDS`.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::domain::AvailabilityReconciler;
use crate::domain::ports::{AvailabilityCache, BookingSweep, UnitRepository};

use super::config::SweepConfig;

/// Spawn the sweep and reconciliation loops. Tasks run until the process
/// exits; one cycle's failure is logged and the next cycle retries.
pub fn spawn_background_tasks<S, U, C>(
    sweeper: Arc<S>,
    reconciler: Arc<AvailabilityReconciler<U, C>>,
    config: SweepConfig,
) -> Vec<JoinHandle<()>>
where
    S: BookingSweep + 'static,
    U: UnitRepository + 'static,
    C: AvailabilityCache + 'static,
{
    let expiry = {
        let sweeper = Arc::clone(&sweeper);
        tokio::spawn(async move {
            let mut ticker = interval(config.expiry_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match sweeper.process_expired_bookings().await {
                    Ok(outcome) if outcome.is_noop() => {
                        debug!("expiry sweep found nothing to do");
                    }
                    Ok(outcome) => {
                        info!(
                            selected = outcome.selected,
                            transitioned = outcome.transitioned,
                            failed = outcome.failed,
                            "expiry sweep finished"
                        );
                    }
                    Err(error) => warn!(%error, "expiry sweep failed, retrying next cycle"),
                }
            }
        })
    };

    let completion = tokio::spawn(async move {
        let mut ticker = interval(config.completion_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match sweeper.process_completed_bookings().await {
                Ok(outcome) if outcome.is_noop() => {
                    debug!("completion sweep found nothing to do");
                }
                Ok(outcome) => {
                    info!(
                        selected = outcome.selected,
                        transitioned = outcome.transitioned,
                        failed = outcome.failed,
                        "completion sweep finished"
                    );
                }
                Err(error) => warn!(%error, "completion sweep failed, retrying next cycle"),
            }
        }
    });

    let reconcile = tokio::spawn(async move {
        let mut ticker = interval(config.cache_reconcile_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            // Outcome logging happens inside the reconciler; skips are
            // expected while a backend restarts.
            let _ = reconciler.reconcile().await;
        }
    });

    vec![expiry, completion, reconcile]
}
