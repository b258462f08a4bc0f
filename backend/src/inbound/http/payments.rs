//! Payment HTTP handlers.
//!
//! ```text
//! POST /api/v1/payments
//! GET  /api/v1/payments/{paymentId}
//! POST /api/v1/payments/{paymentId}/process
//! POST /api/v1/payments/{paymentId}/refund
//! PUT  /api/v1/payments/{paymentId}/status
//! GET  /api/v1/bookings/{bookingId}/payments
//! POST /api/v1/bookings/{bookingId}/payments/cancel-pending
//! ```

use actix_web::{HttpRequest, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{PaymentMethod, PaymentStatus};
use crate::domain::ports::{
    CreatePaymentRequest, PaymentPayload, ProcessPaymentRequest, RefundPaymentRequest,
    UpdatePaymentStatusRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::require_user_id;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_decimal, parse_enum, parse_uuid};

const PAYMENT_METHODS: &str = "CREDIT_CARD, DEBIT_CARD, BANK_TRANSFER, PAYPAL, CRYPTO";
const PAYMENT_STATUSES: &str = "PENDING, COMPLETED, FAILED, REFUNDED, CANCELLED";

/// Request payload for recording a payment.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentBody {
    #[schema(format = "uuid")]
    pub booking_id: String,
    #[schema(example = "115.00")]
    pub amount: String,
    #[schema(example = "CREDIT_CARD")]
    pub payment_method: String,
    pub transaction_id: Option<String>,
}

/// Request payload for a client-driven status change.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentStatusBody {
    #[schema(example = "FAILED")]
    pub status: String,
}

/// Payment returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub booking_id: String,
    #[schema(example = "115.00")]
    pub amount: String,
    #[schema(example = "PENDING")]
    pub status: String,
    #[schema(example = "CREDIT_CARD")]
    pub payment_method: String,
    pub transaction_id: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<PaymentPayload> for PaymentResponseBody {
    fn from(value: PaymentPayload) -> Self {
        Self {
            id: value.id.to_string(),
            booking_id: value.booking_id.to_string(),
            amount: value.amount.to_string(),
            status: value.status.as_str().to_owned(),
            payment_method: value.payment_method.as_str().to_owned(),
            transaction_id: value.transaction_id,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Record a payment for a booking awaiting payment.
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    request_body = CreatePaymentBody,
    responses(
        (status = 200, description = "Payment recorded", body = PaymentResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Booking not found", body = ErrorSchema),
        (status = 409, description = "Booking is not awaiting payment", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "createPayment"
)]
#[post("/payments")]
pub async fn create_payment(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<CreatePaymentBody>,
) -> ApiResult<web::Json<PaymentResponseBody>> {
    let user_id = require_user_id(&req)?;
    let body = payload.into_inner();

    let request = CreatePaymentRequest {
        booking_id: parse_uuid(body.booking_id, FieldName::new("bookingId"))?,
        amount: parse_decimal(body.amount, FieldName::new("amount"))?,
        payment_method: parse_enum::<PaymentMethod>(
            body.payment_method,
            FieldName::new("paymentMethod"),
            PAYMENT_METHODS,
        )?,
        transaction_id: body.transaction_id,
        user_id,
    };

    let payment = state.payments.create_payment(request).await?;
    Ok(web::Json(PaymentResponseBody::from(payment)))
}

/// Fetch one payment.
#[utoipa::path(
    get,
    path = "/api/v1/payments/{paymentId}",
    params(("paymentId" = uuid::Uuid, Path, description = "Payment identifier")),
    responses(
        (status = 200, description = "Payment found", body = PaymentResponseBody),
        (status = 404, description = "Payment not found", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "getPayment"
)]
#[get("/payments/{payment_id}")]
pub async fn get_payment(
    state: web::Data<HttpState>,
    path: web::Path<uuid::Uuid>,
) -> ApiResult<web::Json<PaymentResponseBody>> {
    let payment = state.payments_query.get_payment(path.into_inner()).await?;
    Ok(web::Json(PaymentResponseBody::from(payment)))
}

/// Process a pending payment, confirming its booking.
#[utoipa::path(
    post,
    path = "/api/v1/payments/{paymentId}/process",
    params(("paymentId" = uuid::Uuid, Path, description = "Payment identifier")),
    responses(
        (status = 200, description = "Payment completed, booking confirmed", body = PaymentResponseBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Payment not found", body = ErrorSchema),
        (status = 409, description = "Payment or booking in the wrong status", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "processPayment"
)]
#[post("/payments/{payment_id}/process")]
pub async fn process_payment(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<uuid::Uuid>,
) -> ApiResult<web::Json<PaymentResponseBody>> {
    let user_id = require_user_id(&req)?;
    let payment = state
        .payments
        .process_payment(ProcessPaymentRequest {
            payment_id: path.into_inner(),
            user_id,
        })
        .await?;
    Ok(web::Json(PaymentResponseBody::from(payment)))
}

/// Refund a completed payment.
#[utoipa::path(
    post,
    path = "/api/v1/payments/{paymentId}/refund",
    params(("paymentId" = uuid::Uuid, Path, description = "Payment identifier")),
    responses(
        (status = 200, description = "Payment refunded", body = PaymentResponseBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Payment not found", body = ErrorSchema),
        (status = 409, description = "Payment is not completed", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "refundPayment"
)]
#[post("/payments/{payment_id}/refund")]
pub async fn refund_payment(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<uuid::Uuid>,
) -> ApiResult<web::Json<PaymentResponseBody>> {
    let user_id = require_user_id(&req)?;
    let payment = state
        .payments
        .refund_payment(RefundPaymentRequest {
            payment_id: path.into_inner(),
            user_id,
        })
        .await?;
    Ok(web::Json(PaymentResponseBody::from(payment)))
}

/// Apply a client-driven payment status change.
#[utoipa::path(
    put,
    path = "/api/v1/payments/{paymentId}/status",
    params(("paymentId" = uuid::Uuid, Path, description = "Payment identifier")),
    request_body = UpdatePaymentStatusBody,
    responses(
        (status = 200, description = "Payment status updated", body = PaymentResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Payment not found", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "updatePaymentStatus"
)]
#[put("/payments/{payment_id}/status")]
pub async fn update_payment_status(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<uuid::Uuid>,
    payload: web::Json<UpdatePaymentStatusBody>,
) -> ApiResult<web::Json<PaymentResponseBody>> {
    let user_id = require_user_id(&req)?;
    let status = parse_enum::<PaymentStatus>(
        payload.into_inner().status,
        FieldName::new("status"),
        PAYMENT_STATUSES,
    )?;

    let payment = state
        .payments
        .update_payment_status(UpdatePaymentStatusRequest {
            payment_id: path.into_inner(),
            status,
            user_id,
        })
        .await?;
    Ok(web::Json(PaymentResponseBody::from(payment)))
}

/// Cancel every pending payment of a booking, e.g. after the booking
/// itself was cancelled.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{bookingId}/payments/cancel-pending",
    params(("bookingId" = uuid::Uuid, Path, description = "Booking identifier")),
    responses(
        (status = 204, description = "Pending payments cancelled"),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "cancelPendingPayments"
)]
#[post("/bookings/{booking_id}/payments/cancel-pending")]
pub async fn cancel_pending_payments(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<uuid::Uuid>,
) -> ApiResult<actix_web::HttpResponse> {
    let user_id = require_user_id(&req)?;
    state
        .payments
        .cancel_pending_payments(path.into_inner(), user_id)
        .await?;
    Ok(actix_web::HttpResponse::NoContent().finish())
}

/// All payments recorded against a booking.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{bookingId}/payments",
    params(("bookingId" = uuid::Uuid, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Payments for the booking", body = [PaymentResponseBody])
    ),
    tags = ["payments"],
    operation_id = "listBookingPayments"
)]
#[get("/bookings/{booking_id}/payments")]
pub async fn list_booking_payments(
    state: web::Data<HttpState>,
    path: web::Path<uuid::Uuid>,
) -> ApiResult<web::Json<Vec<PaymentResponseBody>>> {
    let payments = state
        .payments_query
        .list_booking_payments(path.into_inner())
        .await?;
    Ok(web::Json(
        payments.into_iter().map(PaymentResponseBody::from).collect(),
    ))
}
