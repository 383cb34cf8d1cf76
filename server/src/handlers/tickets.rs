use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Json, Path, Query, State};
use axum::response::Response;
use serde_json::json;
use uuid::Uuid;

use super::{json_body, query_params, resource_id};
use crate::auth::AuthUser;
use crate::services::listing::{self, ListingQuery};
use crate::services::{NewTicket, TicketUpdate};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

pub async fn list_tickets(
    State(state): State<AppState>,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let query = query_params(query)?;
    let page = listing::search(state.catalog.tickets()?, &query)?;
    Ok(success(page, "Tickets retrieved"))
}

pub async fn get_ticket(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let id = resource_id(path, "Ticket")?;
    let ticket = state.tickets.view(id)?;
    Ok(success(json!({ "ticket": ticket }), "Ticket retrieved"))
}

pub async fn create_ticket(
    State(state): State<AppState>,
    AuthUser(seller): AuthUser,
    payload: Result<Json<NewTicket>, JsonRejection>,
) -> Result<Response, AppError> {
    let input = json_body(payload)?;
    let ticket = state.tickets.create(&seller, input)?;
    Ok(created(json!({ "ticket": ticket }), "Ticket created successfully"))
}

pub async fn update_ticket(
    State(state): State<AppState>,
    AuthUser(seller): AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<TicketUpdate>, JsonRejection>,
) -> Result<Response, AppError> {
    let id = resource_id(path, "Ticket")?;
    let changes = json_body(payload)?;
    let ticket = state.tickets.update(&seller, id, changes).await?;
    Ok(success(json!({ "ticket": ticket }), "Ticket updated successfully"))
}

pub async fn delete_ticket(
    State(state): State<AppState>,
    AuthUser(seller): AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let id = resource_id(path, "Ticket")?;
    state.tickets.delete(&seller, id).await?;
    Ok(empty_success("Ticket deleted successfully"))
}

pub async fn my_tickets(
    State(state): State<AppState>,
    AuthUser(seller): AuthUser,
) -> Result<Response, AppError> {
    let tickets = state.tickets.listed_by(seller.id)?;
    Ok(success(json!({ "tickets": tickets }), "Tickets retrieved"))
}
