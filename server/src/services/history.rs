//! Purchase lookups joined with their tickets.

use uuid::Uuid;

use crate::models::{Purchase, PurchaseWithTicket};
use crate::store::CatalogSnapshot;

pub fn join(snapshot: &CatalogSnapshot, purchase: &Purchase) -> PurchaseWithTicket {
    PurchaseWithTicket::new(
        purchase.clone(),
        snapshot.ticket(purchase.ticket_id).cloned(),
    )
}

/// Purchases made by `buyer_id`, in the order they were made.
pub fn purchases_by_buyer(snapshot: &CatalogSnapshot, buyer_id: Uuid) -> Vec<PurchaseWithTicket> {
    snapshot
        .purchases
        .iter()
        .filter(|p| p.buyer_id == buyer_id)
        .map(|p| join(snapshot, p))
        .collect()
}

/// Purchases of tickets currently listed by `seller_id`.
pub fn sales_by_seller(snapshot: &CatalogSnapshot, seller_id: Uuid) -> Vec<PurchaseWithTicket> {
    snapshot
        .purchases
        .iter()
        .filter_map(|p| {
            snapshot
                .ticket(p.ticket_id)
                .filter(|t| t.seller_id == seller_id)
                .map(|t| PurchaseWithTicket::new(p.clone(), Some(t.clone())))
        })
        .collect()
}

/// Sorts newest first and keeps at most `limit` entries.
pub fn most_recent(mut entries: Vec<PurchaseWithTicket>, limit: usize) -> Vec<PurchaseWithTicket> {
    entries.sort_by(|a, b| b.purchase.purchase_date.cmp(&a.purchase.purchase_date));
    entries.truncate(limit);
    entries
}
