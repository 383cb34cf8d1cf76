use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Json, Path, Query};
use axum::http::{Method, StatusCode, Uri};
use axum::response::Response;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::utils::error::AppError;
use crate::utils::response::{error, success};

pub mod purchases;
pub mod tickets;
pub mod users;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    message: &'static str,
    timestamp: String,
    version: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "OK",
        message: "TicketHub API is running successfully",
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
    };

    success(payload, "Health check successful")
}

pub async fn root() -> Response {
    let endpoints = json!({
        "health": "/api/health",
        "tickets": "/api/tickets/*",
        "users": "/api/users/*",
        "purchases": "/api/purchases/*",
    });
    success(
        json!({ "name": "TicketHub API Server", "status": "Running", "endpoints": endpoints }),
        "TicketHub API Server",
    )
}

pub async fn not_found(method: Method, uri: Uri) -> Response {
    tracing::info!(%method, path = %uri.path(), "Route not found");
    error(
        "NOT_FOUND",
        "Route not found",
        Some(json!({ "method": method.as_str(), "path": uri.path() })),
        StatusCode::NOT_FOUND,
    )
}

/// Unwraps a JSON body, reporting malformed input in the API error format.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::ValidationError(rejection.body_text()))
}

pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::ValidationError(rejection.body_text()))
}

/// An id that does not parse cannot name an existing resource.
pub(crate) fn resource_id(
    path: Result<Path<Uuid>, PathRejection>,
    resource: &str,
) -> Result<Uuid, AppError> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::NotFound(format!("{} not found", resource)))
}
