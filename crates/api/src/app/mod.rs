//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and request-level operations
//! - `resources.rs`: the identified record kinds served generically
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and response envelopes
//! - `errors.rs`: consistent error responses

use std::sync::Arc;
use std::time::Duration;

use axum::{BoxError, Extension, Router, error_handling::HandleErrorLayer, http::StatusCode, routing::get};
use tower::ServiceBuilder;

use crate::config::Config;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod resources;
pub mod routes;
pub mod services;

/// Upper bound on one request, allocation retries included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &Config) -> anyhow::Result<Router> {
    let services = services::AppServices::connect(config).await?;
    Ok(build_router(config.jwt_secret.clone(), services))
}

/// Router over already-wired services.
pub fn build_router(jwt_secret: String, services: services::AppServices) -> Router {
    let jwt = Arc::new(adminhub_auth::Hs256JwtValidator::new(jwt_secret.into_bytes()));
    let auth_state = middleware::AuthState { jwt };

    // Protected routes: require a valid bearer token.
    let protected = routes::router()
        .layer(Extension(Arc::new(services)))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", protected)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(REQUEST_TIMEOUT),
        )
}

async fn handle_middleware_error(err: BoxError) -> axum::response::Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        errors::json_error(StatusCode::REQUEST_TIMEOUT, "timeout", "request timed out")
    } else {
        errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", err.to_string())
    }
}
