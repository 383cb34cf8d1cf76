use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Json, Path, State};
use axum::response::Response;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{json_body, resource_id};
use crate::auth::AuthUser;
use crate::services::history::{join, purchases_by_buyer, sales_by_seller};
use crate::services::InventoryError;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

/// `ticket_id` is kept raw; an id that is not a UUID names no ticket.
#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub ticket_id: Option<String>,
    pub quantity: Option<QuantityInput>,
}

/// Web forms send quantities as either numbers or numeric strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(i64),
    Text(String),
}

impl QuantityInput {
    pub fn units(&self) -> Option<i64> {
        match self {
            QuantityInput::Number(n) => Some(*n),
            QuantityInput::Text(text) => text.trim().parse().ok(),
        }
    }
}

pub async fn create_purchase(
    State(state): State<AppState>,
    AuthUser(buyer): AuthUser,
    payload: Result<Json<PurchaseRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let request = json_body(payload)?;
    let ticket_ref = request.ticket_id.filter(|id| !id.trim().is_empty());
    let (Some(ticket_ref), Some(quantity)) = (ticket_ref, request.quantity) else {
        return Err(AppError::ValidationError(
            "Ticket ID and quantity are required".to_string(),
        ));
    };
    let quantity = quantity.units().ok_or(InventoryError::InvalidQuantity)?;

    let purchase = state
        .inventory
        .purchase_by_ref(&ticket_ref, &buyer, quantity)
        .await?;
    Ok(created(
        json!({ "purchase": purchase }),
        "Purchase completed successfully",
    ))
}

pub async fn cancel_purchase(
    State(state): State<AppState>,
    AuthUser(buyer): AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let id = resource_id(path, "Purchase")?;
    let purchase = state.inventory.cancel(id, &buyer).await?;
    Ok(success(
        json!({ "purchase": purchase }),
        "Purchase cancelled successfully",
    ))
}

pub async fn get_purchase(
    State(state): State<AppState>,
    AuthUser(buyer): AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let id = resource_id(path, "Purchase")?;
    let snapshot = state.catalog.snapshot()?;
    let purchase = snapshot
        .purchases
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::NotFound("Purchase not found".to_string()))?;

    if purchase.buyer_id != buyer.id {
        return Err(AppError::Forbidden(
            "You can only view your own purchases".to_string(),
        ));
    }

    Ok(success(
        json!({ "purchase": join(&snapshot, purchase) }),
        "Purchase retrieved",
    ))
}

pub async fn my_purchases(
    State(state): State<AppState>,
    AuthUser(buyer): AuthUser,
) -> Result<Response, AppError> {
    let snapshot = state.catalog.snapshot()?;
    let purchases = purchases_by_buyer(&snapshot, buyer.id);
    Ok(success(json!({ "purchases": purchases }), "Purchases retrieved"))
}

pub async fn my_sales(
    State(state): State<AppState>,
    AuthUser(seller): AuthUser,
) -> Result<Response, AppError> {
    let snapshot = state.catalog.snapshot()?;
    let sales = sales_by_seller(&snapshot, seller.id);
    Ok(success(json!({ "sales": sales }), "Sales retrieved"))
}
