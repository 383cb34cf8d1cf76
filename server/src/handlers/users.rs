use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{query_params, resource_id};
use crate::auth::AuthUser;
use crate::models::{PublicUser, TicketStatus};
use crate::services::stats::user_stats;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

const DEFAULT_USER_SEARCH_LIMIT: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct UserSearch {
    pub search: Option<String>,
    pub limit: Option<usize>,
}

pub async fn my_stats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Response, AppError> {
    let snapshot = state.catalog.snapshot()?;
    let stats = user_stats(&snapshot, user.id);
    Ok(success(json!({ "stats": stats }), "Statistics retrieved"))
}

pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let id = resource_id(path, "User")?;
    let user = state
        .catalog
        .user(id)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let active_tickets_count = state
        .catalog
        .tickets()?
        .iter()
        .filter(|t| t.seller_id == id && t.status == TicketStatus::Active)
        .count();

    Ok(success(
        json!({
            "user": PublicUser::from(&user),
            "activeTicketsCount": active_tickets_count,
        }),
        "User retrieved",
    ))
}

pub async fn search_users(
    State(state): State<AppState>,
    query: Result<Query<UserSearch>, QueryRejection>,
) -> Result<Response, AppError> {
    let params = query_params(query)?;
    let needle = params
        .search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let users: Vec<PublicUser> = state
        .catalog
        .users()?
        .iter()
        .filter(|u| {
            needle
                .as_ref()
                .map_or(true, |n| u.name.to_lowercase().contains(n))
        })
        .take(params.limit.unwrap_or(DEFAULT_USER_SEARCH_LIMIT))
        .map(PublicUser::from)
        .collect();

    Ok(success(json!({ "users": users }), "Users retrieved"))
}
