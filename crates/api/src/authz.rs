//! Route-level permission guard.
//!
//! Handlers call [`require`] before touching any service, so storage and
//! domain code stay auth-agnostic.

use axum::http::StatusCode;
use axum::response::Response;

use adminhub_auth::{Permission, authorize};

use crate::app::errors::json_error;
use crate::context::PrincipalContext;

/// `403` unless the principal holds `permission` (or the wildcard).
pub fn require(principal: &PrincipalContext, permission: &'static str) -> Result<(), Response> {
    authorize(&principal.principal(), &Permission::new(permission))
        .map_err(|e| json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()))
}
