//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] aggregates every HTTP endpoint and the inbound schema
//! wrappers. Swagger UI serves the generated document in debug builds.

use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, openapi};

use crate::inbound::http::bookings::{BookingResponseBody, CreateBookingBody};
use crate::inbound::http::pages::PageBody;
use crate::inbound::http::payments::{
    CreatePaymentBody, PaymentResponseBody, UpdatePaymentStatusBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::units::{AvailableUnitsBody, UnitBody, UnitResponseBody};

/// Register the user-identification header as a security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(openapi::Components::default);

        components.add_security_scheme(
            "UserIdHeader",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "X-User-Id",
                "UUID identifying the acting user. Authentication is out of scope.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Staybook backend API",
        description = "Accommodation units, bookings with a payment window, and payment records."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::list_user_bookings,
        crate::inbound::http::bookings::get_booking,
        crate::inbound::http::bookings::confirm_booking,
        crate::inbound::http::bookings::cancel_booking,
        crate::inbound::http::units::create_unit,
        crate::inbound::http::units::search_units,
        crate::inbound::http::units::available_units_count,
        crate::inbound::http::units::get_unit,
        crate::inbound::http::units::update_unit,
        crate::inbound::http::units::delete_unit,
        crate::inbound::http::payments::create_payment,
        crate::inbound::http::payments::get_payment,
        crate::inbound::http::payments::process_payment,
        crate::inbound::http::payments::refund_payment,
        crate::inbound::http::payments::update_payment_status,
        crate::inbound::http::payments::cancel_pending_payments,
        crate::inbound::http::payments::list_booking_payments,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CreateBookingBody,
        BookingResponseBody,
        PageBody<BookingResponseBody>,
        UnitBody,
        UnitResponseBody,
        PageBody<UnitResponseBody>,
        AvailableUnitsBody,
        CreatePaymentBody,
        UpdatePaymentStatusBody,
        PaymentResponseBody,
    )),
    tags(
        (name = "bookings", description = "Booking lifecycle"),
        (name = "units", description = "Unit inventory and search"),
        (name = "payments", description = "Payment records"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;
