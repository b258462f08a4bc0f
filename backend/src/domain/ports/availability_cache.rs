//! Port for the cached available-units count.
//!
//! The cache holds a single derived scalar: the number of units with
//! `available == true`. It has no authoritative write path other than
//! recomputation from the unit store; every unit mutation invalidates it,
//! and a periodic reconciliation task overwrites it wholesale.

use async_trait::async_trait;

/// Errors raised by availability cache adapters.
///
/// Like audit writes, cache failures are log-and-continue for the services;
/// the next reconciliation cycle is the retry mechanism.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AvailabilityCacheError {
    /// Cache backend could not be reached.
    #[error("availability cache connection failed: {message}")]
    Connection { message: String },
    /// A cache command failed during execution.
    #[error("availability cache command failed: {message}")]
    Command { message: String },
}

impl AvailabilityCacheError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a command error with the given message.
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
        }
    }
}

/// Port for the derived available-units count.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvailabilityCache: Send + Sync {
    /// Read the cached count; `None` on a miss.
    async fn get_count(&self) -> Result<Option<u64>, AvailabilityCacheError>;

    /// Overwrite the cached count.
    async fn put_count(&self, count: u64) -> Result<(), AvailabilityCacheError>;

    /// Drop the cached count so the next read recomputes from the store.
    async fn invalidate(&self) -> Result<(), AvailabilityCacheError>;
}

/// Cache that never holds a value. Every read misses; writes succeed
/// silently. Useful for wiring without a Redis backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpAvailabilityCache;

#[async_trait]
impl AvailabilityCache for NoOpAvailabilityCache {
    async fn get_count(&self) -> Result<Option<u64>, AvailabilityCacheError> {
        Ok(None)
    }

    async fn put_count(&self, _count: u64) -> Result<(), AvailabilityCacheError> {
        Ok(())
    }

    async fn invalidate(&self) -> Result<(), AvailabilityCacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn noop_cache_always_misses() {
        let cache = NoOpAvailabilityCache;
        cache.put_count(7).await.expect("noop put succeeds");
        let cached = cache.get_count().await.expect("noop get succeeds");
        assert!(cached.is_none());
    }

    #[rstest]
    fn command_error_formats_message() {
        let error = AvailabilityCacheError::command("timeout");
        assert!(error.to_string().contains("timeout"));
    }
}
