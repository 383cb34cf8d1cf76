//! Catalog storage.
//!
//! The transaction engine talks to the catalog only through [`CatalogStore`].
//! Every method is atomic with respect to every other: a reader never sees a
//! ticket update without the purchase record that caused it.
//!
//! Serializing compound read-modify-write sequences is *not* the store's job;
//! callers take the per-ticket lock from [`TicketLocks`] first.

pub mod locks;
pub mod memory;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{Purchase, Ticket, User};

pub use locks::TicketLocks;
pub use memory::InMemoryCatalog;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("catalog lock poisoned by a panicking writer")]
    Poisoned,

    #[error("ticket {0} disappeared during a committed write")]
    MissingTicket(Uuid),

    #[error("purchase {0} disappeared during a committed write")]
    MissingPurchase(Uuid),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A consistent view of the whole catalog, taken under a single read lock.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub tickets: Vec<Ticket>,
    pub purchases: Vec<Purchase>,
}

impl CatalogSnapshot {
    pub fn ticket(&self, id: Uuid) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }
}

pub trait CatalogStore: Send + Sync {
    fn insert_user(&self, user: User) -> StoreResult<()>;
    fn user(&self, id: Uuid) -> StoreResult<Option<User>>;
    fn users(&self) -> StoreResult<Vec<User>>;

    fn insert_ticket(&self, ticket: Ticket) -> StoreResult<()>;
    fn ticket(&self, id: Uuid) -> StoreResult<Option<Ticket>>;
    /// All tickets in insertion order.
    fn tickets(&self) -> StoreResult<Vec<Ticket>>;
    /// Overwrites an existing ticket. Returns `false` if it no longer exists.
    fn replace_ticket(&self, ticket: Ticket) -> StoreResult<bool>;
    fn remove_ticket(&self, id: Uuid) -> StoreResult<Option<Ticket>>;
    /// Bumps the view counter and returns the updated ticket.
    fn record_view(&self, id: Uuid) -> StoreResult<Option<Ticket>>;

    fn insert_purchase(&self, purchase: Purchase) -> StoreResult<()>;
    fn purchase(&self, id: Uuid) -> StoreResult<Option<Purchase>>;
    fn purchases(&self) -> StoreResult<Vec<Purchase>>;

    /// Writes the updated ticket and appends the new purchase as one unit.
    fn commit_purchase(&self, ticket: &Ticket, purchase: &Purchase) -> StoreResult<()>;

    /// Writes the cancelled purchase and, when the listing still exists, the
    /// restored ticket as one unit.
    fn commit_cancellation(&self, purchase: &Purchase, ticket: Option<&Ticket>)
        -> StoreResult<()>;

    fn snapshot(&self) -> StoreResult<CatalogSnapshot>;
}
