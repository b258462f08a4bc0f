//! Caller identity extraction.
//!
//! Authentication is out of scope; the acting user is identified by an
//! `X-User-Id` header carrying a UUID. Handlers that mutate state require
//! it; a missing or malformed header is rejected before any domain call.

use actix_web::HttpRequest;
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Header naming the acting user.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Extract the acting user id from the request headers.
pub fn require_user_id(req: &HttpRequest) -> Result<Uuid, Error> {
    let raw = req
        .headers()
        .get(USER_ID_HEADER)
        .ok_or_else(|| {
            Error::unauthorized(format!("missing {USER_ID_HEADER} header"))
                .with_details(json!({ "header": USER_ID_HEADER, "code": "missing_header" }))
        })?
        .to_str()
        .map_err(|_| {
            Error::unauthorized(format!("{USER_ID_HEADER} header must be ASCII"))
                .with_details(json!({ "header": USER_ID_HEADER, "code": "invalid_header" }))
        })?;

    Uuid::parse_str(raw).map_err(|_| {
        Error::unauthorized(format!("{USER_ID_HEADER} header must be a valid UUID"))
            .with_details(json!({
                "header": USER_ID_HEADER,
                "value": raw,
                "code": "invalid_header",
            }))
    })
}
