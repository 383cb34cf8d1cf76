use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::AuthError;
use crate::services::inventory::InventoryError;
use crate::store::StoreError;
use crate::utils::response::error as error_response;

static EXPOSE_INTERNAL_DETAILS: AtomicBool = AtomicBool::new(false);

/// Include internal error detail in 500 responses. Only enabled in development.
pub fn expose_internal_details(enabled: bool) {
    EXPOSE_INTERNAL_DETAILS.store(enabled, Ordering::Relaxed);
}

/// Coarse classification of failures, shared by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing input.
    Validation,
    /// Business-rule violation the caller can resolve by acting differently.
    Conflict,
    /// Caller is not allowed to act on the resource.
    Authorization,
    NotFound,
    Internal,
}

impl ErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::Validation | ErrorKind::Conflict => StatusCode::BAD_REQUEST,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("Catalog error")]
    StoreError(#[from] StoreError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::AuthError(err.to_string())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Inventory(e) => e.kind().status_code(),
            AppError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::AuthError(_) => "AUTH_ERROR",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Inventory(e) => e.code(),
            AppError::StoreError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg)
            | AppError::AuthError(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg) => {
                warn!(code = self.code(), message = %msg, "Request rejected");
            }
            AppError::Inventory(e) if e.kind() != ErrorKind::Internal => {
                warn!(code = self.code(), message = %e, "Inventory rule rejected request");
            }
            AppError::Inventory(e) => {
                error!(error = ?e, "Inventory engine fault");
            }
            AppError::StoreError(e) => {
                error!(error = ?e, "Catalog store error");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Log internal details
        self.log();

        if self.is_internal() {
            let details = EXPOSE_INTERNAL_DETAILS
                .load(Ordering::Relaxed)
                .then(|| json!({ "reason": internal_reason(&self) }));
            return error_response(code, "Something went wrong", details, status);
        }

        let public_message = match &self {
            AppError::ValidationError(msg)
            | AppError::AuthError(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg) => msg.clone(),
            other => other.to_string(),
        };

        error_response(code, public_message, None, status)
    }
}

fn internal_reason(err: &AppError) -> String {
    match err {
        AppError::StoreError(e) => e.to_string(),
        other => other.to_string(),
    }
}
