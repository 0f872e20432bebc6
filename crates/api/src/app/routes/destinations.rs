use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use adminhub_auth::permissions::{RECORDS_DELETE, RECORDS_READ, RECORDS_WRITE};
use adminhub_tourism::{Destination, DestinationPatch, NewDestination};

use crate::app::routes::common::{json_body, parse_id};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_destinations).post(create_destination))
        .route(
            "/:id",
            get(get_destination)
                .patch(update_destination)
                .delete(delete_destination),
        )
}

pub async fn list_destinations(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_READ)?;
    let items = services
        .list::<Destination>()
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(Json(dto::data(items)).into_response())
}

pub async fn create_destination(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<NewDestination>, JsonRejection>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_WRITE)?;
    let input = json_body(body)?;
    let destination = services
        .create_destination(input)
        .await
        .map_err(errors::service_error_to_response)?;
    Ok((StatusCode::CREATED, Json(dto::data(destination))).into_response())
}

pub async fn get_destination(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_READ)?;
    let id = parse_id(&id)?;
    let destination = services
        .get::<Destination>(id)
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(Json(dto::data(destination)).into_response())
}

pub async fn update_destination(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<DestinationPatch>, JsonRejection>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_WRITE)?;
    let id = parse_id(&id)?;
    let patch = json_body(body)?;
    let destination = services
        .update_destination(id, patch)
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(Json(dto::data(destination)).into_response())
}

pub async fn delete_destination(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_DELETE)?;
    let id = parse_id(&id)?;
    services
        .delete_record::<Destination>(id)
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
