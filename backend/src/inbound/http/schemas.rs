//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`; this
//! module registers equivalent schema shapes in the inbound layer where
//! framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The caller supplied no usable identity.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The acting user does not own the targeted resource.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The resource is contended: unit unavailable or dates overlap.
    #[schema(rename = "conflict")]
    Conflict,
    /// The operation is not legal in the resource's current status.
    #[schema(rename = "invalid_state")]
    InvalidState,
    /// A backing store or cache could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "unit is not available")]
    message: String,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}
