//! Application configuration read from the environment.
//!
//! Every knob has an explicit default except `DATABASE_URL`, which has no
//! sensible fallback. Values are read through an injectable lookup so tests
//! never mutate process environment.

use std::net::SocketAddr;
use std::time::Duration;

use crate::domain::BookingPolicy;

/// Errors raised while assembling the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable was absent.
    #[error("missing required environment variable {name}")]
    MissingVar { name: &'static str },
    /// A variable was present but unparseable.
    #[error("invalid value for {name}: {message}")]
    InvalidVar { name: &'static str, message: String },
}

/// Intervals for the background tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepConfig {
    /// How often pending bookings past their payment deadline are
    /// cancelled.
    pub expiry_interval: Duration,
    /// How often confirmed bookings past check-out are completed.
    pub completion_interval: Duration,
    /// How often the availability cache is recomputed from the unit store.
    pub cache_reconcile_interval: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            expiry_interval: Duration::from_secs(60),
            completion_interval: Duration::from_secs(60),
            cache_reconcile_interval: Duration::from_secs(300),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub redis_url: String,
    pub policy: BookingPolicy,
    pub sweeps: SweepConfig,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through the supplied variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_or(&lookup, "BIND_ADDR", "0.0.0.0:8080")?;
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::MissingVar {
            name: "DATABASE_URL",
        })?;
        let redis_url =
            lookup("REDIS_URL").unwrap_or_else(|| "redis://127.0.0.1:6379".to_owned());

        let policy = BookingPolicy {
            payment_timeout_minutes: parse_or(&lookup, "BOOKING_PAYMENT_TIMEOUT_MINUTES", "15")?,
            markup_percent: parse_or(&lookup, "BOOKING_MARKUP_PERCENT", "15")?,
        };

        let sweeps = SweepConfig {
            expiry_interval: Duration::from_secs(parse_or(
                &lookup,
                "BOOKING_EXPIRY_SWEEP_SECONDS",
                "60",
            )?),
            completion_interval: Duration::from_secs(parse_or(
                &lookup,
                "BOOKING_COMPLETION_SWEEP_SECONDS",
                "60",
            )?),
            cache_reconcile_interval: Duration::from_secs(parse_or(
                &lookup,
                "CACHE_RECONCILE_SECONDS",
                "300",
            )?),
        };

        Ok(Self {
            bind_addr,
            database_url,
            redis_url,
            policy,
            sweeps,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(name).unwrap_or_else(|| default.to_owned());
    raw.parse().map_err(|err: T::Err| ConfigError::InvalidVar {
        name,
        message: err.to_string(),
    })
}
