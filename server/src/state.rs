use chrono::Duration;
use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::services::{InventoryEngine, TicketService};
use crate::store::{CatalogStore, TicketLocks};
use crate::utils::clock::Clock;

/// Shared by every handler; cloning is a handful of `Arc` bumps.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub inventory: Arc<InventoryEngine>,
    pub tickets: Arc<TicketService>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
        cancellation_window: Duration,
    ) -> Self {
        // Purchases and seller edits must contend on the same lock table.
        let locks = Arc::new(TicketLocks::new());

        let inventory = InventoryEngine::new(catalog.clone(), locks.clone(), clock.clone())
            .with_cancellation_window(cancellation_window);
        let tickets = TicketService::new(catalog.clone(), locks, clock);

        Self {
            catalog,
            identity,
            inventory: Arc::new(inventory),
            tickets: Arc::new(tickets),
        }
    }
}
