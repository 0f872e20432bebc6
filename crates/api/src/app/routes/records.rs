//! CRUD for records that carry an allocated identifier.
//!
//! Mounted once per kind (`/customers`, `/guides`, `/packages`, `/tourists`,
//! `/hotels`). Creates never accept an identifier from the client; it is
//! allocated inside the same request that performs the insert.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use adminhub_auth::permissions::{RECORDS_DELETE, RECORDS_READ, RECORDS_WRITE};

use crate::app::resources::ManagedRecord;
use crate::app::routes::common::{json_body, parse_id};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router<R: ManagedRecord>() -> Router {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route("/next-id", get(next_id::<R>))
        .route("/:id", get(get_one::<R>).patch(update::<R>).delete(delete::<R>))
}

/// GET /<kinds>/next-id - preview of the identifier a create would get now.
pub async fn next_id<R: ManagedRecord>(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_READ)?;
    let identifier = services
        .next_identifier(R::KIND)
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(Json(dto::next_id(identifier)).into_response())
}

pub async fn create<R: ManagedRecord>(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<R::New>, JsonRejection>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_WRITE)?;
    let input = json_body(body)?;
    let record = services
        .create::<R>(input)
        .await
        .map_err(|e| errors::create_error_to_response(R::KIND, e))?;
    Ok((StatusCode::CREATED, Json(dto::data(record))).into_response())
}

pub async fn list<R: ManagedRecord>(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_READ)?;
    let items = services
        .list::<R>()
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(Json(dto::data(items)).into_response())
}

pub async fn get_one<R: ManagedRecord>(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_READ)?;
    let id = parse_id(&id)?;
    let record = services
        .get::<R>(id)
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(Json(dto::data(record)).into_response())
}

/// PATCH /<kinds>/:id - partial update; the identifier is not patchable.
pub async fn update<R: ManagedRecord>(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<R::Patch>, JsonRejection>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_WRITE)?;
    let id = parse_id(&id)?;
    let patch = json_body(body)?;
    let record = services
        .update::<R>(id, patch)
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(Json(dto::data(record)).into_response())
}

pub async fn delete<R: ManagedRecord>(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_DELETE)?;
    let id = parse_id(&id)?;
    services
        .delete_identified::<R>(id)
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
