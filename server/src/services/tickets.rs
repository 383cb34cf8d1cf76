//! Seller-side listing management.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::Identity;
use crate::models::{Ticket, TicketStatus};
use crate::store::{CatalogStore, TicketLocks};
use crate::utils::clock::Clock;
use crate::utils::error::AppError;

pub const DEFAULT_IMAGE_URL: &str =
    "https://images.pexels.com/photos/1763075/pexels-photo-1763075.jpeg?auto=compress&cs=tinysrgb&w=800";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTicket {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub ticket_type: Option<String>,
    pub price: Option<Decimal>,
    pub expiry_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub available_quantity: Option<i64>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub available_quantity: Option<i64>,
    pub image_url: Option<String>,
    pub status: Option<TicketStatus>,
}

pub struct TicketService {
    catalog: Arc<dyn CatalogStore>,
    locks: Arc<TicketLocks>,
    clock: Arc<dyn Clock>,
}

impl TicketService {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        locks: Arc<TicketLocks>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            locks,
            clock,
        }
    }

    pub fn create(&self, seller: &Identity, input: NewTicket) -> Result<Ticket, AppError> {
        let missing =
            || AppError::ValidationError("All required fields must be provided".to_string());

        let title = required_text(input.title).ok_or_else(missing)?;
        let description = required_text(input.description).ok_or_else(missing)?;
        let category = required_text(input.category).ok_or_else(missing)?;
        let ticket_type = required_text(input.ticket_type).ok_or_else(missing)?;
        let location = required_text(input.location).ok_or_else(missing)?;
        let price = input.price.ok_or_else(missing)?;
        let expiry_time = input.expiry_time.ok_or_else(missing)?;
        let available = input.available_quantity.ok_or_else(missing)?;

        validate_price(price)?;
        if available <= 0 {
            return Err(AppError::ValidationError(
                "Available quantity must be greater than 0".to_string(),
            ));
        }
        let available_quantity = unit_count(available)?;

        let now = self.clock.now();
        let ticket = Ticket {
            id: Uuid::new_v4(),
            title,
            description,
            category,
            ticket_type,
            price,
            expiry_time,
            seller_id: seller.id,
            seller_name: seller.name.clone(),
            image_url: required_text(input.image_url)
                .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string()),
            location,
            available_quantity,
            sold_quantity: 0,
            status: TicketStatus::Active,
            views: 0,
            inquiries: 0,
            created_at: now,
            updated_at: now,
        };

        self.catalog.insert_ticket(ticket.clone())?;
        info!(ticket_id = %ticket.id, seller_id = %seller.id, "Ticket listed");
        Ok(ticket)
    }

    /// Applies a partial edit from the ticket's seller.
    ///
    /// Edits are serialized with purchases on the ticket lock. Lowering
    /// `available_quantity` is not checked against units already sold.
    pub async fn update(
        &self,
        seller: &Identity,
        ticket_id: Uuid,
        changes: TicketUpdate,
    ) -> Result<Ticket, AppError> {
        let _guard = self.locks.acquire(ticket_id).await;

        let mut ticket = self.owned_ticket(seller, ticket_id, "update")?;

        if let Some(title) = required_text(changes.title) {
            ticket.title = title;
        }
        if let Some(description) = required_text(changes.description) {
            ticket.description = description;
        }
        if let Some(price) = changes.price {
            validate_price(price)?;
            ticket.price = price;
        }
        if let Some(available) = changes.available_quantity {
            if available < 0 {
                return Err(AppError::ValidationError(
                    "Available quantity cannot be negative".to_string(),
                ));
            }
            ticket.available_quantity = unit_count(available)?;
        }
        if let Some(image_url) = required_text(changes.image_url) {
            ticket.image_url = image_url;
        }
        match changes.status {
            Some(status) => ticket.status = status,
            None => ticket.sync_status(),
        }
        ticket.updated_at = self.clock.now();

        if !self.catalog.replace_ticket(ticket.clone())? {
            return Err(AppError::NotFound("Ticket not found".to_string()));
        }
        info!(%ticket_id, status = %ticket.status, "Ticket updated");
        Ok(ticket)
    }

    pub async fn delete(&self, seller: &Identity, ticket_id: Uuid) -> Result<(), AppError> {
        let guard = self.locks.acquire(ticket_id).await;

        self.owned_ticket(seller, ticket_id, "delete")?;
        self.catalog.remove_ticket(ticket_id)?;

        drop(guard);
        self.locks.forget(ticket_id);
        info!(%ticket_id, seller_id = %seller.id, "Ticket deleted");
        Ok(())
    }

    /// Fetches a ticket for display, counting the view.
    pub fn view(&self, ticket_id: Uuid) -> Result<Ticket, AppError> {
        self.catalog
            .record_view(ticket_id)?
            .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))
    }

    pub fn listed_by(&self, seller_id: Uuid) -> Result<Vec<Ticket>, AppError> {
        Ok(self
            .catalog
            .tickets()?
            .into_iter()
            .filter(|t| t.seller_id == seller_id)
            .collect())
    }

    fn owned_ticket(
        &self,
        seller: &Identity,
        ticket_id: Uuid,
        action: &str,
    ) -> Result<Ticket, AppError> {
        let ticket = self
            .catalog
            .ticket(ticket_id)?
            .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;
        if ticket.seller_id != seller.id {
            return Err(AppError::Forbidden(format!(
                "You can only {} your own tickets",
                action
            )));
        }
        Ok(ticket)
    }
}

fn required_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn validate_price(price: Decimal) -> Result<(), AppError> {
    if price <= Decimal::ZERO {
        return Err(AppError::ValidationError(
            "Price must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn unit_count(quantity: i64) -> Result<u32, AppError> {
    u32::try_from(quantity)
        .map_err(|_| AppError::ValidationError("Available quantity is too large".to_string()))
}
