//! Availability-count reconciliation.
//!
//! The cached available-units count is derived state with no authoritative
//! write path other than recomputation from the unit store. This service
//! periodically overwrites the cache with the recomputed count, healing
//! missed invalidations and cache-backend restarts. It never fails its
//! caller: an unreachable backend means the cycle is skipped and logged,
//! and the next cycle retries.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{AvailabilityCache, UnitRepository};

/// Result of one reconciliation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The cache now holds the recomputed count.
    Healed { count: u64 },
    /// A backend was unreachable; nothing was written this cycle.
    Skipped,
}

/// Periodic recompute-and-overwrite task for the availability cache.
#[derive(Clone)]
pub struct AvailabilityReconciler<U, C> {
    unit_repo: Arc<U>,
    availability_cache: Arc<C>,
}

impl<U, C> AvailabilityReconciler<U, C> {
    /// Create a new reconciler.
    pub fn new(unit_repo: Arc<U>, availability_cache: Arc<C>) -> Self {
        Self {
            unit_repo,
            availability_cache,
        }
    }
}

impl<U, C> AvailabilityReconciler<U, C>
where
    U: UnitRepository,
    C: AvailabilityCache,
{
    /// Recompute the count from the unit store and overwrite the cache.
    pub async fn reconcile(&self) -> ReconcileOutcome {
        let count = match self.unit_repo.count_available().await {
            Ok(count) => count,
            Err(error) => {
                warn!(%error, "unit store unreachable, skipping availability reconciliation");
                return ReconcileOutcome::Skipped;
            }
        };

        match self.availability_cache.put_count(count).await {
            Ok(()) => {
                info!(count, "availability cache reconciled");
                ReconcileOutcome::Healed { count }
            }
            Err(error) => {
                warn!(%error, "availability cache unreachable, skipping reconciliation cycle");
                ReconcileOutcome::Skipped
            }
        }
    }
}
