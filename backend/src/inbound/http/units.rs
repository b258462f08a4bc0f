//! Unit HTTP handlers.
//!
//! ```text
//! POST   /api/v1/units
//! GET    /api/v1/units
//! GET    /api/v1/units/availability/count
//! GET    /api/v1/units/{unitId}
//! PUT    /api/v1/units/{unitId}
//! DELETE /api/v1/units/{unitId}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::AccommodationType;
use crate::domain::ports::{
    CreateUnitRequest, DeleteUnitRequest, SearchUnitsRequest, UnitDraft, UnitPayload,
    UnitSearchFilter, UpdateUnitRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::require_user_id;
use crate::inbound::http::pages::{PageBody, PageQuery};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_decimal, parse_enum, parse_rfc3339_timestamp,
};

const ACCOMMODATION_TYPES: &str = "HOME, FLAT, APARTMENTS";

/// Request payload for creating or updating a unit.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitBody {
    #[schema(minimum = 1)]
    pub number_of_rooms: i32,
    #[schema(example = "APARTMENTS")]
    pub accommodation_type: String,
    pub floor: i32,
    #[schema(example = "100.00")]
    pub base_price: String,
    pub description: String,
}

impl UnitBody {
    fn into_draft(self) -> ApiResult<UnitDraft> {
        Ok(UnitDraft {
            number_of_rooms: self.number_of_rooms,
            accommodation_type: parse_enum::<AccommodationType>(
                self.accommodation_type,
                FieldName::new("accommodationType"),
                ACCOMMODATION_TYPES,
            )?,
            floor: self.floor,
            base_price: parse_decimal(self.base_price, FieldName::new("basePrice"))?,
            description: self.description,
        })
    }
}

/// Unit returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub number_of_rooms: i32,
    #[schema(example = "APARTMENTS")]
    pub accommodation_type: String,
    pub floor: i32,
    #[schema(example = "100.00")]
    pub base_price: String,
    #[schema(example = "115.00")]
    pub total_price: String,
    pub description: String,
    pub available: bool,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<UnitPayload> for UnitResponseBody {
    fn from(value: UnitPayload) -> Self {
        Self {
            id: value.id.to_string(),
            number_of_rooms: value.number_of_rooms,
            accommodation_type: value.accommodation_type.as_str().to_owned(),
            floor: value.floor,
            base_price: value.base_price.to_string(),
            total_price: value.total_price.to_string(),
            description: value.description,
            available: value.available,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Query parameters for unit search.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct UnitSearchQuery {
    pub number_of_rooms: Option<i32>,
    /// One of HOME, FLAT, APARTMENTS.
    pub accommodation_type: Option<String>,
    pub floor: Option<i32>,
    /// Inclusive lower bound on the advertised total price.
    pub min_price: Option<String>,
    /// Inclusive upper bound on the advertised total price.
    pub max_price: Option<String>,
    /// Requested stay start; with `checkOutDate`, excludes units that an
    /// active booking holds over any part of the window.
    pub check_in_date: Option<String>,
    /// Requested stay end.
    pub check_out_date: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl UnitSearchQuery {
    fn into_request(self) -> ApiResult<SearchUnitsRequest> {
        let page = PageQuery {
            page: self.page,
            size: self.size,
        }
        .into_request()?;

        let accommodation_type = self
            .accommodation_type
            .map(|value| {
                parse_enum::<AccommodationType>(
                    value,
                    FieldName::new("accommodationType"),
                    ACCOMMODATION_TYPES,
                )
            })
            .transpose()?;
        let min_price = self
            .min_price
            .map(|value| parse_decimal(value, FieldName::new("minPrice")))
            .transpose()?;
        let max_price = self
            .max_price
            .map(|value| parse_decimal(value, FieldName::new("maxPrice")))
            .transpose()?;
        let check_in = self
            .check_in_date
            .map(|value| parse_rfc3339_timestamp(value, FieldName::new("checkInDate")))
            .transpose()?;
        let check_out = self
            .check_out_date
            .map(|value| parse_rfc3339_timestamp(value, FieldName::new("checkOutDate")))
            .transpose()?;

        Ok(SearchUnitsRequest {
            filter: UnitSearchFilter {
                number_of_rooms: self.number_of_rooms,
                accommodation_type,
                floor: self.floor,
                min_price,
                max_price,
                check_in,
                check_out,
            },
            page,
        })
    }
}

/// Count of currently available units.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailableUnitsBody {
    pub count: u64,
}

/// Create a unit.
#[utoipa::path(
    post,
    path = "/api/v1/units",
    request_body = UnitBody,
    responses(
        (status = 200, description = "Unit created", body = UnitResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["units"],
    operation_id = "createUnit"
)]
#[post("/units")]
pub async fn create_unit(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<UnitBody>,
) -> ApiResult<web::Json<UnitResponseBody>> {
    let user_id = require_user_id(&req)?;
    let draft = payload.into_inner().into_draft()?;

    let unit = state
        .units
        .create_unit(CreateUnitRequest { draft, user_id })
        .await?;
    Ok(web::Json(UnitResponseBody::from(unit)))
}

/// Search available units.
#[utoipa::path(
    get,
    path = "/api/v1/units",
    params(UnitSearchQuery),
    responses(
        (status = 200, description = "Matching units", body = PageBody<UnitResponseBody>),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["units"],
    operation_id = "searchUnits"
)]
#[get("/units")]
pub async fn search_units(
    state: web::Data<HttpState>,
    query: web::Query<UnitSearchQuery>,
) -> ApiResult<web::Json<PageBody<UnitResponseBody>>> {
    let request = query.into_inner().into_request()?;
    let units = state.units_query.search_units(request).await?;
    Ok(web::Json(PageBody::from_page(units)))
}

/// Count currently available units (cached).
#[utoipa::path(
    get,
    path = "/api/v1/units/availability/count",
    responses(
        (status = 200, description = "Available-units count", body = AvailableUnitsBody),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["units"],
    operation_id = "availableUnitsCount"
)]
#[get("/units/availability/count")]
pub async fn available_units_count(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<AvailableUnitsBody>> {
    let count = state.units_query.available_units_count().await?;
    Ok(web::Json(AvailableUnitsBody { count }))
}

/// Fetch one unit.
#[utoipa::path(
    get,
    path = "/api/v1/units/{unitId}",
    params(("unitId" = uuid::Uuid, Path, description = "Unit identifier")),
    responses(
        (status = 200, description = "Unit found", body = UnitResponseBody),
        (status = 404, description = "Unit not found", body = ErrorSchema)
    ),
    tags = ["units"],
    operation_id = "getUnit"
)]
#[get("/units/{unit_id}")]
pub async fn get_unit(
    state: web::Data<HttpState>,
    path: web::Path<uuid::Uuid>,
) -> ApiResult<web::Json<UnitResponseBody>> {
    let unit = state.units_query.get_unit(path.into_inner()).await?;
    Ok(web::Json(UnitResponseBody::from(unit)))
}

/// Update a unit's attributes.
#[utoipa::path(
    put,
    path = "/api/v1/units/{unitId}",
    params(("unitId" = uuid::Uuid, Path, description = "Unit identifier")),
    request_body = UnitBody,
    responses(
        (status = 200, description = "Unit updated", body = UnitResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Unit not found", body = ErrorSchema)
    ),
    tags = ["units"],
    operation_id = "updateUnit"
)]
#[put("/units/{unit_id}")]
pub async fn update_unit(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<uuid::Uuid>,
    payload: web::Json<UnitBody>,
) -> ApiResult<web::Json<UnitResponseBody>> {
    let user_id = require_user_id(&req)?;
    let draft = payload.into_inner().into_draft()?;

    let unit = state
        .units
        .update_unit(UpdateUnitRequest {
            unit_id: path.into_inner(),
            draft,
            user_id,
        })
        .await?;
    Ok(web::Json(UnitResponseBody::from(unit)))
}

/// Delete a unit that no active booking references.
#[utoipa::path(
    delete,
    path = "/api/v1/units/{unitId}",
    params(("unitId" = uuid::Uuid, Path, description = "Unit identifier")),
    responses(
        (status = 204, description = "Unit deleted"),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Unit not found", body = ErrorSchema),
        (status = 409, description = "Unit referenced by an active booking", body = ErrorSchema)
    ),
    tags = ["units"],
    operation_id = "deleteUnit"
)]
#[delete("/units/{unit_id}")]
pub async fn delete_unit(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<uuid::Uuid>,
) -> ApiResult<HttpResponse> {
    let user_id = require_user_id(&req)?;
    state
        .units
        .delete_unit(DeleteUnitRequest {
            unit_id: path.into_inner(),
            user_id,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
