//! Zone routes.
//!
//! Renames, merges and deletes rewrite customer zone references in the same
//! request; see `adminhub_infra::zones`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};

use adminhub_auth::permissions::{RECORDS_READ, RECORDS_WRITE, ZONES_MANAGE};
use adminhub_isp::NewZone;

use crate::app::routes::common::json_body;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_zones).post(create_zone))
        .route("/merge", post(merge_zones))
        .route("/repair", post(repair_zones))
        .route("/:name", delete(delete_zone))
        .route("/:name/rename", post(rename_zone))
}

pub async fn list_zones(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_READ)?;
    let zones = services
        .zones()
        .list()
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(Json(dto::data(zones)).into_response())
}

pub async fn create_zone(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<NewZone>, JsonRejection>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_WRITE)?;
    let input = json_body(body)?;
    let zone = services
        .zones()
        .create(input)
        .await
        .map_err(errors::service_error_to_response)?;
    Ok((StatusCode::CREATED, Json(dto::data(zone))).into_response())
}

/// POST /zones/:name/rename
pub async fn rename_zone(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(name): Path<String>,
    body: Result<Json<dto::RenameZoneRequest>, JsonRejection>,
) -> Result<Response, Response> {
    authz::require(&principal, ZONES_MANAGE)?;
    let body = json_body(body)?;
    let change = services
        .zones()
        .rename(&name, &body.new_name)
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(Json(dto::data(change)).into_response())
}

/// POST /zones/merge
pub async fn merge_zones(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::MergeZonesRequest>, JsonRejection>,
) -> Result<Response, Response> {
    authz::require(&principal, ZONES_MANAGE)?;
    let body = json_body(body)?;
    let change = services
        .zones()
        .merge(&body.sources, &body.target)
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(Json(dto::data(change)).into_response())
}

/// DELETE /zones/:name?reassignTo=<zone>
pub async fn delete_zone(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(name): Path<String>,
    Query(query): Query<dto::DeleteZoneQuery>,
) -> Result<Response, Response> {
    authz::require(&principal, ZONES_MANAGE)?;
    let change = services
        .zones()
        .delete(&name, query.reassign_to.as_deref())
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(Json(dto::data(change)).into_response())
}

/// POST /zones/repair - unassign customers pointing at missing zones.
pub async fn repair_zones(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, Response> {
    authz::require(&principal, ZONES_MANAGE)?;
    let change = services
        .zones()
        .repair_dangling()
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(Json(dto::data(change)).into_response())
}
