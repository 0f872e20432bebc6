use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};

use adminhub_auth::permissions::{RECORDS_DELETE, RECORDS_READ, RECORDS_WRITE};
use adminhub_tourism::{Booking, NewBooking};

use crate::app::routes::common::{json_body, parse_id};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_bookings).post(create_booking))
        .route("/quote", post(quote_booking))
        .route("/:id", get(get_booking).delete(delete_booking))
        .route("/:id/status", patch(set_status))
}

pub async fn list_bookings(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_READ)?;
    let items = services
        .list::<Booking>()
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(Json(dto::data(items)).into_response())
}

/// POST /bookings/quote - price without storing.
pub async fn quote_booking(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::QuoteRequest>, JsonRejection>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_READ)?;
    let request = json_body(body)?;
    let quote = services
        .quote_booking(request)
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(Json(dto::data(quote)).into_response())
}

pub async fn create_booking(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<NewBooking>, JsonRejection>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_WRITE)?;
    let input = json_body(body)?;
    let booking = services
        .create_booking(input)
        .await
        .map_err(errors::service_error_to_response)?;
    Ok((StatusCode::CREATED, Json(dto::data(booking))).into_response())
}

pub async fn get_booking(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_READ)?;
    let id = parse_id(&id)?;
    let booking = services
        .get::<Booking>(id)
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(Json(dto::data(booking)).into_response())
}

/// PATCH /bookings/:id/status
pub async fn set_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<dto::BookingStatusRequest>, JsonRejection>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_WRITE)?;
    let id = parse_id(&id)?;
    let body = json_body(body)?;
    let booking = services
        .set_booking_status(id, body.status)
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(Json(dto::data(booking)).into_response())
}

pub async fn delete_booking(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_DELETE)?;
    let id = parse_id(&id)?;
    services
        .delete_record::<Booking>(id)
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
