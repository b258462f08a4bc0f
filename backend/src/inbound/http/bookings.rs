//! Booking HTTP handlers.
//!
//! ```text
//! POST /api/v1/bookings
//! GET  /api/v1/bookings
//! GET  /api/v1/bookings/{bookingId}
//! POST /api/v1/bookings/{bookingId}/confirm
//! POST /api/v1/bookings/{bookingId}/cancel
//! ```

use actix_web::{HttpRequest, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    BookingPayload, CancelBookingRequest, ConfirmBookingRequest, CreateBookingRequest,
    ListUserBookingsRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::require_user_id;
use crate::inbound::http::pages::{PageBody, PageQuery};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_rfc3339_timestamp, parse_uuid};

/// Request payload for creating a booking.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingBody {
    #[schema(format = "uuid")]
    pub unit_id: String,
    #[schema(format = "date-time")]
    pub check_in_date: String,
    #[schema(format = "date-time")]
    pub check_out_date: String,
}

/// Booking returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub unit_id: String,
    #[schema(format = "uuid")]
    pub user_id: String,
    #[schema(format = "date-time")]
    pub check_in_date: String,
    #[schema(format = "date-time")]
    pub check_out_date: String,
    #[schema(example = "115.00")]
    pub total_price: String,
    #[schema(example = "PENDING_PAYMENT")]
    pub status: String,
    #[schema(format = "date-time")]
    pub payment_deadline: String,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<BookingPayload> for BookingResponseBody {
    fn from(value: BookingPayload) -> Self {
        Self {
            id: value.id.to_string(),
            unit_id: value.unit_id.to_string(),
            user_id: value.user_id.to_string(),
            check_in_date: value.check_in_date.to_rfc3339(),
            check_out_date: value.check_out_date.to_rfc3339(),
            total_price: value.total_price.to_string(),
            status: value.status.as_str().to_owned(),
            payment_deadline: value.payment_deadline.to_rfc3339(),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Create a booking, holding the unit until payment or expiry.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = CreateBookingBody,
    responses(
        (status = 200, description = "Booking created", body = BookingResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Unit not found", body = ErrorSchema),
        (status = 409, description = "Unit unavailable or dates overlap", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<CreateBookingBody>,
) -> ApiResult<web::Json<BookingResponseBody>> {
    let user_id = require_user_id(&req)?;
    let body = payload.into_inner();

    let request = CreateBookingRequest {
        unit_id: parse_uuid(body.unit_id, FieldName::new("unitId"))?,
        user_id,
        check_in_date: parse_rfc3339_timestamp(body.check_in_date, FieldName::new("checkInDate"))?,
        check_out_date: parse_rfc3339_timestamp(
            body.check_out_date,
            FieldName::new("checkOutDate"),
        )?,
    };

    let booking = state.bookings.create_booking(request).await?;
    Ok(web::Json(BookingResponseBody::from(booking)))
}

/// Fetch one booking.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{bookingId}",
    params(("bookingId" = uuid::Uuid, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Booking found", body = BookingResponseBody),
        (status = 404, description = "Booking not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "getBooking"
)]
#[get("/bookings/{booking_id}")]
pub async fn get_booking(
    state: web::Data<HttpState>,
    path: web::Path<uuid::Uuid>,
) -> ApiResult<web::Json<BookingResponseBody>> {
    let booking = state.bookings_query.get_booking(path.into_inner()).await?;
    Ok(web::Json(BookingResponseBody::from(booking)))
}

/// Page through the calling user's bookings.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    params(PageQuery),
    responses(
        (status = 200, description = "Bookings for the calling user", body = PageBody<BookingResponseBody>),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "listUserBookings"
)]
#[get("/bookings")]
pub async fn list_user_bookings(
    state: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<PageBody<BookingResponseBody>>> {
    let user_id = require_user_id(&req)?;
    let page = query.into_inner().into_request()?;

    let bookings = state
        .bookings_query
        .list_user_bookings(ListUserBookingsRequest { user_id, page })
        .await?;
    Ok(web::Json(PageBody::from_page(bookings)))
}

/// Confirm a pending booking.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{bookingId}/confirm",
    params(("bookingId" = uuid::Uuid, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Booking confirmed", body = BookingResponseBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Caller does not own the booking", body = ErrorSchema),
        (status = 404, description = "Booking not found", body = ErrorSchema),
        (status = 409, description = "Booking is not pending", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "confirmBooking"
)]
#[post("/bookings/{booking_id}/confirm")]
pub async fn confirm_booking(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<uuid::Uuid>,
) -> ApiResult<web::Json<BookingResponseBody>> {
    let user_id = require_user_id(&req)?;
    let booking = state
        .bookings
        .confirm_booking(ConfirmBookingRequest {
            booking_id: path.into_inner(),
            user_id,
        })
        .await?;
    Ok(web::Json(BookingResponseBody::from(booking)))
}

/// Cancel a booking, releasing the unit.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{bookingId}/cancel",
    params(("bookingId" = uuid::Uuid, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingResponseBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Caller does not own the booking", body = ErrorSchema),
        (status = 404, description = "Booking not found", body = ErrorSchema),
        (status = 409, description = "Booking already cancelled or completed", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "cancelBooking"
)]
#[post("/bookings/{booking_id}/cancel")]
pub async fn cancel_booking(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<uuid::Uuid>,
) -> ApiResult<web::Json<BookingResponseBody>> {
    let user_id = require_user_id(&req)?;
    let booking = state
        .bookings
        .cancel_booking(CancelBookingRequest {
            booking_id: path.into_inner(),
            user_id,
        })
        .await?;
    Ok(web::Json(BookingResponseBody::from(booking)))
}

#[cfg(test)]
#[path = "bookings_tests.rs"]
mod tests;
