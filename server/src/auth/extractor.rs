use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::{AuthError, Identity};
use crate::state::AppState;
use crate::utils::error::AppError;

/// Handler argument that requires `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let identity = state.identity.authenticate(token)?;
        tracing::debug!(user_id = %identity.id, "Authenticated request");
        Ok(Self(identity))
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::MalformedCredential)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedCredential)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingCredential);
    }
    Ok(token)
}
