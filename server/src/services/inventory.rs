//! Purchase and cancellation of ticket inventory.
//!
//! Both operations are read-check-write sequences against one ticket. They run
//! under that ticket's lock from [`TicketLocks`], and their writes land through
//! a single [`CatalogStore`] commit, so a concurrent reader sees either none or
//! all of an operation's effects.

use chrono::Duration;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::Identity;
use crate::models::{Purchase, PurchaseStatus, PurchaseWithTicket, Ticket, TicketStatus};
use crate::store::{CatalogStore, StoreError, TicketLocks};
use crate::utils::clock::Clock;
use crate::utils::error::ErrorKind;

pub const DEFAULT_CANCELLATION_WINDOW_HOURS: i64 = 24;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Quantity must be greater than 0")]
    InvalidQuantity,

    #[error("Ticket not found")]
    TicketNotFound,

    #[error("Purchase not found")]
    PurchaseNotFound,

    #[error("Ticket is not available for purchase")]
    Unavailable,

    #[error("Only {available} tickets available")]
    InsufficientInventory { available: u32 },

    #[error("You cannot purchase your own tickets")]
    SelfPurchase,

    #[error("You can only cancel your own purchases")]
    NotPurchaseOwner,

    #[error("Purchase can only be cancelled within {hours} hours")]
    WindowExpired { hours: i64 },

    #[error("Purchase is already cancelled")]
    AlreadyCancelled,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl InventoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InventoryError::InvalidQuantity => ErrorKind::Validation,
            InventoryError::TicketNotFound | InventoryError::PurchaseNotFound => {
                ErrorKind::NotFound
            }
            InventoryError::Unavailable
            | InventoryError::InsufficientInventory { .. }
            | InventoryError::SelfPurchase
            | InventoryError::WindowExpired { .. }
            | InventoryError::AlreadyCancelled => ErrorKind::Conflict,
            InventoryError::NotPurchaseOwner => ErrorKind::Authorization,
            InventoryError::Store(_) => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            InventoryError::InvalidQuantity => "INVALID_QUANTITY",
            InventoryError::TicketNotFound | InventoryError::PurchaseNotFound => "NOT_FOUND",
            InventoryError::Unavailable => "TICKET_UNAVAILABLE",
            InventoryError::InsufficientInventory { .. } => "INSUFFICIENT_INVENTORY",
            InventoryError::SelfPurchase => "SELF_PURCHASE_FORBIDDEN",
            InventoryError::NotPurchaseOwner => "FORBIDDEN",
            InventoryError::WindowExpired { .. } => "CANCELLATION_WINDOW_EXPIRED",
            InventoryError::AlreadyCancelled => "ALREADY_CANCELLED",
            InventoryError::Store(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

pub struct InventoryEngine {
    catalog: Arc<dyn CatalogStore>,
    locks: Arc<TicketLocks>,
    clock: Arc<dyn Clock>,
    cancellation_window: Duration,
}

impl InventoryEngine {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        locks: Arc<TicketLocks>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            locks,
            clock,
            cancellation_window: Duration::hours(DEFAULT_CANCELLATION_WINDOW_HOURS),
        }
    }

    pub fn with_cancellation_window(mut self, window: Duration) -> Self {
        self.cancellation_window = window;
        self
    }

    pub fn cancellation_window(&self) -> Duration {
        self.cancellation_window
    }

    /// [`purchase`](Self::purchase) for a ticket id exactly as a client sent
    /// it. A reference that is not a UUID names no ticket.
    pub async fn purchase_by_ref(
        &self,
        ticket_ref: &str,
        buyer: &Identity,
        quantity: i64,
    ) -> Result<PurchaseWithTicket, InventoryError> {
        match Uuid::parse_str(ticket_ref.trim()) {
            Ok(ticket_id) => self.purchase(ticket_id, buyer, quantity).await,
            Err(_) => {
                check_quantity(quantity)?;
                Err(InventoryError::TicketNotFound)
            }
        }
    }

    /// Buys `quantity` units of a ticket on behalf of `buyer`.
    ///
    /// Checks run in a fixed order and the first failure is reported:
    /// quantity, existence, listing status, availability, self-purchase.
    pub async fn purchase(
        &self,
        ticket_id: Uuid,
        buyer: &Identity,
        quantity: i64,
    ) -> Result<PurchaseWithTicket, InventoryError> {
        check_quantity(quantity)?;

        let _guard = self.locks.acquire(ticket_id).await;

        let Some(mut ticket) = self.catalog.ticket(ticket_id)? else {
            self.locks.forget(ticket_id);
            return Err(InventoryError::TicketNotFound);
        };

        let quantity = check_purchasable(&ticket, buyer, quantity)?;

        let now = self.clock.now();
        let purchase = Purchase {
            id: Uuid::new_v4(),
            ticket_id,
            buyer_id: buyer.id,
            quantity,
            total_amount: ticket.price * Decimal::from(quantity),
            purchase_date: now,
            status: PurchaseStatus::Confirmed,
        };
        ticket.reserve_units(quantity, now);

        self.catalog.commit_purchase(&ticket, &purchase)?;

        info!(
            purchase_id = %purchase.id,
            ticket_id = %ticket_id,
            buyer_id = %buyer.id,
            quantity,
            total_amount = %purchase.total_amount,
            remaining = ticket.available_quantity,
            status = %ticket.status,
            "Purchase completed"
        );

        Ok(PurchaseWithTicket::new(purchase, Some(ticket)))
    }

    /// Reverses a purchase inside the cancellation window.
    ///
    /// If the seller has since deleted the listing, the purchase is still
    /// cancelled and no inventory is restored.
    pub async fn cancel(
        &self,
        purchase_id: Uuid,
        requester: &Identity,
    ) -> Result<Purchase, InventoryError> {
        let ticket_id = self
            .catalog
            .purchase(purchase_id)?
            .ok_or(InventoryError::PurchaseNotFound)?
            .ticket_id;

        let guard = self.locks.acquire(ticket_id).await;
        let ticket = self.catalog.ticket(ticket_id)?;
        let orphaned = ticket.is_none();

        let outcome = self.cancel_locked(purchase_id, requester, ticket);

        // Nothing else removes the lock entry of a deleted listing.
        drop(guard);
        if orphaned {
            self.locks.forget(ticket_id);
            debug!(
                %ticket_id,
                tracked = self.locks.tracked(),
                "Released lock of deleted listing"
            );
        }

        let purchase = outcome?;
        info!(
            %purchase_id,
            %ticket_id,
            buyer_id = %requester.id,
            quantity = purchase.quantity,
            restored = !orphaned,
            "Purchase cancelled"
        );

        Ok(purchase)
    }

    /// Cancel checks and commit; the caller holds the ticket lock.
    fn cancel_locked(
        &self,
        purchase_id: Uuid,
        requester: &Identity,
        ticket: Option<Ticket>,
    ) -> Result<Purchase, InventoryError> {
        // Re-read under the lock: a concurrent cancel may have won the race.
        let mut purchase = self
            .catalog
            .purchase(purchase_id)?
            .ok_or(InventoryError::PurchaseNotFound)?;

        if purchase.buyer_id != requester.id {
            return Err(InventoryError::NotPurchaseOwner);
        }

        let now = self.clock.now();
        if now.signed_duration_since(purchase.purchase_date) > self.cancellation_window {
            return Err(InventoryError::WindowExpired {
                hours: self.cancellation_window.num_hours(),
            });
        }

        if purchase.is_cancelled() {
            return Err(InventoryError::AlreadyCancelled);
        }

        purchase.status = PurchaseStatus::Cancelled;
        let ticket = ticket.map(|mut ticket| {
            ticket.release_units(purchase.quantity, now);
            ticket
        });

        self.catalog.commit_cancellation(&purchase, ticket.as_ref())?;
        Ok(purchase)
    }
}

fn check_quantity(quantity: i64) -> Result<(), InventoryError> {
    if quantity <= 0 {
        return Err(InventoryError::InvalidQuantity);
    }
    Ok(())
}

/// Validates a purchase request against the current ticket state and returns
/// the quantity as a unit count.
fn check_purchasable(
    ticket: &Ticket,
    buyer: &Identity,
    quantity: i64,
) -> Result<u32, InventoryError> {
    // A sold-out listing fails on availability below, so the caller learns
    // how many units are left rather than a generic "unavailable".
    let exhausted = ticket.status == TicketStatus::SoldOut && ticket.available_quantity == 0;
    if ticket.status != TicketStatus::Active && !exhausted {
        return Err(InventoryError::Unavailable);
    }

    if i64::from(ticket.available_quantity) < quantity {
        return Err(InventoryError::InsufficientInventory {
            available: ticket.available_quantity,
        });
    }

    if ticket.seller_id == buyer.id {
        return Err(InventoryError::SelfPurchase);
    }

    u32::try_from(quantity).map_err(|_| InventoryError::InsufficientInventory {
        available: ticket.available_quantity,
    })
}
