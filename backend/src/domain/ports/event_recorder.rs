//! Port for the append-only audit event sink.

use async_trait::async_trait;

use crate::domain::NewDomainEvent;

/// Errors raised by event recorder adapters.
///
/// Services treat these as log-and-continue: an audit write failure must
/// never make an otherwise-successful transition look failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventRecorderError {
    /// Sink connection could not be established.
    #[error("event sink connection failed: {message}")]
    Connection { message: String },
    /// The append failed during execution.
    #[error("event sink write failed: {message}")]
    Write { message: String },
}

impl EventRecorderError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a write error with the given message.
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }
}

/// Port for appending audit events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRecorder: Send + Sync {
    /// Append one event to the audit trail.
    async fn record(&self, event: NewDomainEvent) -> Result<(), EventRecorderError>;
}

/// Recorder that drops every event. Useful where auditing is irrelevant.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpEventRecorder;

#[async_trait]
impl EventRecorder for NoOpEventRecorder {
    async fn record(&self, _event: NewDomainEvent) -> Result<(), EventRecorderError> {
        Ok(())
    }
}
