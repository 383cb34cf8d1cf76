use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// One async mutex per ticket id.
///
/// Purchases, cancellations and seller edits of the same ticket run one at a
/// time; different tickets never contend. Guards are owned so they can be held
/// across `.await` points.
#[derive(Debug, Default)]
pub struct TicketLocks {
    locks: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl TicketLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, ticket_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            // The map only holds handles, so a poisoned guard is still usable.
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(ticket_id).or_default())
        };
        lock.lock_owned().await
    }

    /// Drops the lock entry for a deleted ticket.
    pub fn forget(&self, ticket_id: Uuid) {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&ticket_id);
    }

    /// Number of tickets with a lock entry.
    pub fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
