use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use adminhub_core::EntityKind;
use adminhub_infra::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        ServiceError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        ServiceError::NotFound(what) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("{what} not found"))
        }
        ServiceError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        ServiceError::Allocation(e) => {
            tracing::error!(error = %e, "identifier allocation failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "allocation_error", e.to_string())
        }
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
    }
}

/// Create failures keep the client-facing shape
/// `{"error": "Failed to create <kind>", "message": ...}` for 500s.
pub fn create_error_to_response(kind: EntityKind, err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Allocation(_) | ServiceError::Store(_) => {
            tracing::error!(kind = %kind, error = %err, "create failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(json!({
                    "error": format!("Failed to create {}", kind.label()),
                    "message": err.to_string(),
                })),
            )
                .into_response()
        }
        other => service_error_to_response(other),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use adminhub_infra::AllocationError;

    #[test]
    fn exhaustion_is_reported_as_failed_create() {
        let err = ServiceError::Allocation(AllocationError::Exhausted {
            kind: EntityKind::Customer,
            attempts: 5,
        });
        let res = create_error_to_response(EntityKind::Customer, err);
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_keeps_its_status_on_create() {
        let err = ServiceError::Validation("name must not be empty".to_string());
        let res = create_error_to_response(EntityKind::Guide, err);
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let res = service_error_to_response(ServiceError::not_found("zone 'North'"));
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
