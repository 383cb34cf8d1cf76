use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use super::{CatalogSnapshot, CatalogStore, StoreError, StoreResult};
use crate::models::{Purchase, Ticket, User};

#[derive(Debug, Default)]
struct Catalog {
    users: Vec<User>,
    tickets: Vec<Ticket>,
    purchases: Vec<Purchase>,
}

impl Catalog {
    fn ticket_mut(&mut self, id: Uuid) -> Option<&mut Ticket> {
        self.tickets.iter_mut().find(|t| t.id == id)
    }

    fn purchase_mut(&mut self, id: Uuid) -> Option<&mut Purchase> {
        self.purchases.iter_mut().find(|p| p.id == id)
    }
}

/// Process-memory catalog behind a single reader/writer lock.
///
/// Vectors keep insertion order so listings with equal sort keys come back
/// in the order tickets were created.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    inner: RwLock<Catalog>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Catalog>> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Catalog>> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }
}

impl CatalogStore for InMemoryCatalog {
    fn insert_user(&self, user: User) -> StoreResult<()> {
        self.write()?.users.push(user);
        Ok(())
    }

    fn user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.iter().find(|u| u.id == id).cloned())
    }

    fn users(&self) -> StoreResult<Vec<User>> {
        Ok(self.read()?.users.clone())
    }

    fn insert_ticket(&self, ticket: Ticket) -> StoreResult<()> {
        self.write()?.tickets.push(ticket);
        Ok(())
    }

    fn ticket(&self, id: Uuid) -> StoreResult<Option<Ticket>> {
        Ok(self.read()?.tickets.iter().find(|t| t.id == id).cloned())
    }

    fn tickets(&self) -> StoreResult<Vec<Ticket>> {
        Ok(self.read()?.tickets.clone())
    }

    fn replace_ticket(&self, ticket: Ticket) -> StoreResult<bool> {
        let mut catalog = self.write()?;
        match catalog.ticket_mut(ticket.id) {
            Some(slot) => {
                *slot = ticket;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove_ticket(&self, id: Uuid) -> StoreResult<Option<Ticket>> {
        let mut catalog = self.write()?;
        let removed = catalog
            .tickets
            .iter()
            .position(|t| t.id == id)
            .map(|index| catalog.tickets.remove(index));
        Ok(removed)
    }

    fn record_view(&self, id: Uuid) -> StoreResult<Option<Ticket>> {
        let mut catalog = self.write()?;
        Ok(catalog.ticket_mut(id).map(|ticket| {
            ticket.views = ticket.views.saturating_add(1);
            ticket.clone()
        }))
    }

    fn insert_purchase(&self, purchase: Purchase) -> StoreResult<()> {
        self.write()?.purchases.push(purchase);
        Ok(())
    }

    fn purchase(&self, id: Uuid) -> StoreResult<Option<Purchase>> {
        Ok(self.read()?.purchases.iter().find(|p| p.id == id).cloned())
    }

    fn purchases(&self) -> StoreResult<Vec<Purchase>> {
        Ok(self.read()?.purchases.clone())
    }

    fn commit_purchase(&self, ticket: &Ticket, purchase: &Purchase) -> StoreResult<()> {
        let mut catalog = self.write()?;
        // Check before mutating anything so a failed commit leaves no trace.
        let slot = catalog
            .ticket_mut(ticket.id)
            .ok_or(StoreError::MissingTicket(ticket.id))?;
        *slot = ticket.clone();
        catalog.purchases.push(purchase.clone());
        Ok(())
    }

    fn commit_cancellation(
        &self,
        purchase: &Purchase,
        ticket: Option<&Ticket>,
    ) -> StoreResult<()> {
        let mut catalog = self.write()?;
        if catalog.purchase_mut(purchase.id).is_none() {
            return Err(StoreError::MissingPurchase(purchase.id));
        }
        if let Some(ticket) = ticket {
            if let Some(slot) = catalog.ticket_mut(ticket.id) {
                *slot = ticket.clone();
            }
        }
        if let Some(slot) = catalog.purchase_mut(purchase.id) {
            *slot = purchase.clone();
        }
        Ok(())
    }

    fn snapshot(&self) -> StoreResult<CatalogSnapshot> {
        let catalog = self.read()?;
        Ok(CatalogSnapshot {
            tickets: catalog.tickets.clone(),
            purchases: catalog.purchases.clone(),
        })
    }
}
