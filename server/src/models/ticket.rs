use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Active,
    SoldOut,
    Cancelled,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Active => "active",
            TicketStatus::SoldOut => "sold_out",
            TicketStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(TicketStatus::Active),
            "sold_out" => Ok(TicketStatus::SoldOut),
            "cancelled" => Ok(TicketStatus::Cancelled),
            other => Err(format!("Unknown ticket status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub ticket_type: String,
    pub price: Decimal,
    pub expiry_time: DateTime<Utc>,
    pub seller_id: Uuid,
    pub seller_name: String,
    pub image_url: String,
    pub location: String,
    pub available_quantity: u32,
    pub sold_quantity: u32,
    pub status: TicketStatus,
    pub views: u64,
    pub inquiries: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Units ever put on sale: conserved by purchases and cancellations.
    pub fn total_units(&self) -> u64 {
        u64::from(self.available_quantity) + u64::from(self.sold_quantity)
    }

    /// Moves `quantity` units from available to sold.
    ///
    /// The caller must already have checked `available_quantity >= quantity`
    /// under the ticket's lock.
    pub fn reserve_units(&mut self, quantity: u32, now: DateTime<Utc>) {
        debug_assert!(self.available_quantity >= quantity);
        self.available_quantity = self.available_quantity.saturating_sub(quantity);
        self.sold_quantity = self.sold_quantity.saturating_add(quantity);
        self.sync_status();
        self.updated_at = now;
    }

    /// Moves `quantity` units back from sold to available.
    pub fn release_units(&mut self, quantity: u32, now: DateTime<Utc>) {
        self.available_quantity = self.available_quantity.saturating_add(quantity);
        self.sold_quantity = self.sold_quantity.saturating_sub(quantity);
        self.sync_status();
        self.updated_at = now;
    }

    /// Re-derives the `active`/`sold_out` flag from availability.
    ///
    /// Every path that touches `available_quantity` goes through here.
    /// A cancelled (deactivated) listing is left alone.
    pub fn sync_status(&mut self) {
        self.status = match self.status {
            TicketStatus::Active if self.available_quantity == 0 => TicketStatus::SoldOut,
            TicketStatus::SoldOut if self.available_quantity > 0 => TicketStatus::Active,
            status => status,
        };
    }

    pub fn is_sold_out(&self) -> bool {
        self.status == TicketStatus::SoldOut
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    pub(crate) fn sample_ticket(available: u32) -> Ticket {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Ticket {
            id: Uuid::new_v4(),
            title: "Test Match".to_string(),
            description: "Grandstand seats".to_string(),
            category: "cricket".to_string(),
            ticket_type: "general".to_string(),
            price: dec!(100.00),
            expiry_time: created + chrono::Duration::days(30),
            seller_id: Uuid::new_v4(),
            seller_name: "Seller".to_string(),
            image_url: "https://example.com/ticket.jpg".to_string(),
            location: "Lord's, London".to_string(),
            available_quantity: available,
            sold_quantity: 0,
            status: TicketStatus::Active,
            views: 0,
            inquiries: 0,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_reserve_all_units_marks_sold_out() {
        let mut ticket = sample_ticket(3);
        let now = ticket.created_at + chrono::Duration::minutes(5);

        ticket.reserve_units(3, now);

        assert_eq!(ticket.available_quantity, 0);
        assert_eq!(ticket.sold_quantity, 3);
        assert_eq!(ticket.status, TicketStatus::SoldOut);
        assert_eq!(ticket.updated_at, now);
    }

    #[test]
    fn test_release_reactivates_sold_out_ticket() {
        let mut ticket = sample_ticket(2);
        let now = ticket.created_at;
        ticket.reserve_units(2, now);

        ticket.release_units(1, now);

        assert_eq!(ticket.available_quantity, 1);
        assert_eq!(ticket.sold_quantity, 1);
        assert_eq!(ticket.status, TicketStatus::Active);
        assert_eq!(ticket.total_units(), 2);
    }

    #[test]
    fn test_release_keeps_cancelled_listing_cancelled() {
        let mut ticket = sample_ticket(1);
        let now = ticket.created_at;
        ticket.reserve_units(1, now);
        ticket.status = TicketStatus::Cancelled;

        ticket.release_units(1, now);

        assert_eq!(ticket.status, TicketStatus::Cancelled);
        assert_eq!(ticket.available_quantity, 1);
    }

    #[test]
    fn test_status_round_trips_through_strings() {
        for status in [
            TicketStatus::Active,
            TicketStatus::SoldOut,
            TicketStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<TicketStatus>(), Ok(status));
        }
        assert!("archived".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn test_ticket_serializes_type_field() {
        let ticket = sample_ticket(1);
        let json = serde_json::to_value(&ticket).unwrap();
        assert_eq!(json["type"], "general");
        assert_eq!(json["status"], "active");
        assert_eq!(json["price"], "100.00");
    }
}
