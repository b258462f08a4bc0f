//! Staybook backend library modules.
//!
//! The crate follows a hexagonal layout: `domain` holds entities, ports, and
//! services; `inbound` and `outbound` hold the HTTP and persistence/cache
//! adapters; `server` wires everything together and owns the background
//! sweep scheduler.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

#[cfg(test)]
pub(crate) mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware attaching a `Trace-Id` header.
pub use middleware::trace::Trace;
