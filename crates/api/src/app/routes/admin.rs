//! Maintenance endpoints.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use adminhub_auth::permissions::ADMIN_MAINTENANCE;
use adminhub_core::EntityKind;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new().route("/identifiers/:kind/audit", get(audit_identifiers))
}

/// GET /admin/identifiers/:kind/audit - stored identifiers that are not in
/// the kind's canonical format.
pub async fn audit_identifiers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(kind): Path<String>,
) -> Result<Response, Response> {
    authz::require(&principal, ADMIN_MAINTENANCE)?;
    let kind: EntityKind = kind
        .parse()
        .map_err(|e: adminhub_core::DomainError| {
            errors::json_error(StatusCode::BAD_REQUEST, "invalid_kind", e.to_string())
        })?;
    let audit = services
        .audit(kind)
        .await
        .map_err(errors::service_error_to_response)?;
    Ok(Json(dto::data(audit)).into_response())
}
