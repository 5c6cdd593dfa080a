//! Route handlers

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

pub mod auth;
pub mod credentials;
pub mod health;
pub mod users;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type RouteError = (StatusCode, Json<ErrorResponse>);

pub fn route_error(status: StatusCode, error: impl Into<String>) -> RouteError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

pub fn bad_request(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::BAD_REQUEST, error)
}

pub fn unauthorized(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::UNAUTHORIZED, error)
}

pub fn forbidden(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::FORBIDDEN, error)
}

pub fn not_found(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::NOT_FOUND, error)
}

pub fn conflict(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::CONFLICT, error)
}

/// Detail stays in the server log; clients get a generic message.
pub fn internal_error(error: impl std::fmt::Display) -> RouteError {
    tracing::error!("request failed: {}", error);
    route_error(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
}
