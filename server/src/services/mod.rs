pub mod history;
pub mod inventory;
pub mod listing;
pub mod stats;
pub mod tickets;

pub use inventory::{InventoryEngine, InventoryError};
pub use listing::{ListingQuery, TicketPage};
pub use stats::UserStats;
pub use tickets::{NewTicket, TicketService, TicketUpdate};
