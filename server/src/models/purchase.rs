use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Ticket;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Purchase {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub buyer_id: Uuid,
    pub quantity: u32,
    /// Unit price times quantity, frozen at purchase time.
    pub total_amount: Decimal,
    pub purchase_date: DateTime<Utc>,
    pub status: PurchaseStatus,
}

impl Purchase {
    pub fn is_cancelled(&self) -> bool {
        self.status == PurchaseStatus::Cancelled
    }
}

/// A purchase joined with its ticket. `ticket` is `None` once the listing
/// has been deleted by its seller.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PurchaseWithTicket {
    #[serde(flatten)]
    pub purchase: Purchase,
    pub ticket: Option<Ticket>,
}

impl PurchaseWithTicket {
    pub fn new(purchase: Purchase, ticket: Option<Ticket>) -> Self {
        Self { purchase, ticket }
    }
}
