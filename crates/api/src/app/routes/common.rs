use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::Response;

use adminhub_core::RecordId;

use crate::app::errors;

/// Parse a `:id` path segment.
pub fn parse_id(raw: &str) -> Result<RecordId, Response> {
    raw.parse().map_err(|_| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_id",
            format!("'{raw}' is not a valid record id"),
        )
    })
}

/// Unwrap a JSON body, turning schema failures into `400 validation_error`.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    body.map(|Json(value)| value).map_err(|rejection| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            rejection.body_text(),
        )
    })
}
