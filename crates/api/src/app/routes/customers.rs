use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::patch,
};

use adminhub_auth::permissions::RECORDS_WRITE;
use adminhub_isp::Customer;

use crate::app::routes::common::{json_body, parse_id};
use crate::app::routes::records;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    records::router::<Customer>().route("/:id/images", patch(attach_images))
}

/// PATCH /customers/:id/images - store URLs returned by the upload service.
pub async fn attach_images(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<dto::AttachImagesRequest>, JsonRejection>,
) -> Result<Response, Response> {
    authz::require(&principal, RECORDS_WRITE)?;
    let id = parse_id(&id)?;
    let body = json_body(body)?;
    let customer = services
        .attach_customer_images(id, body.id_front_url, body.id_back_url)
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(Json(dto::data(customer)).into_response())
}
