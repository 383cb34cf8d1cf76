//! Seller and buyer dashboards, computed from a catalog snapshot.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::history::{most_recent, purchases_by_buyer, sales_by_seller};
use crate::models::{PurchaseStatus, PurchaseWithTicket, TicketStatus};
use crate::store::CatalogSnapshot;

pub const RECENT_ACTIVITY_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    // Selling
    pub total_tickets_listed: usize,
    pub active_tickets: usize,
    pub sold_out_tickets: usize,
    pub total_tickets_sold: u64,
    pub total_revenue: Decimal,
    pub total_views: u64,
    pub total_inquiries: u64,

    // Buying
    pub total_purchases: usize,
    pub total_spent: Decimal,
    pub confirmed_purchases: usize,
    pub pending_purchases: usize,
    pub cancelled_purchases: usize,

    pub recent_sales: Vec<PurchaseWithTicket>,
    pub recent_purchases: Vec<PurchaseWithTicket>,
}

pub fn user_stats(snapshot: &CatalogSnapshot, user_id: Uuid) -> UserStats {
    let listed: Vec<_> = snapshot
        .tickets
        .iter()
        .filter(|t| t.seller_id == user_id)
        .collect();
    let sales = sales_by_seller(snapshot, user_id);
    let purchases = purchases_by_buyer(snapshot, user_id);

    let count_status = |status: PurchaseStatus| {
        purchases
            .iter()
            .filter(|p| p.purchase.status == status)
            .count()
    };

    UserStats {
        total_tickets_listed: listed.len(),
        active_tickets: listed
            .iter()
            .filter(|t| t.status == TicketStatus::Active)
            .count(),
        sold_out_tickets: listed
            .iter()
            .filter(|t| t.status == TicketStatus::SoldOut)
            .count(),
        total_tickets_sold: listed.iter().map(|t| u64::from(t.sold_quantity)).sum(),
        total_revenue: sales.iter().map(|s| s.purchase.total_amount).sum(),
        total_views: listed.iter().map(|t| t.views).sum(),
        total_inquiries: listed.iter().map(|t| t.inquiries).sum(),

        total_purchases: purchases.len(),
        total_spent: purchases.iter().map(|p| p.purchase.total_amount).sum(),
        confirmed_purchases: count_status(PurchaseStatus::Confirmed),
        pending_purchases: count_status(PurchaseStatus::Pending),
        cancelled_purchases: count_status(PurchaseStatus::Cancelled),

        recent_sales: most_recent(sales, RECENT_ACTIVITY_LIMIT),
        recent_purchases: most_recent(purchases, RECENT_ACTIVITY_LIMIT),
    }
}
