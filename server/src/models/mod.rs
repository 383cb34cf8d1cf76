pub mod purchase;
pub mod ticket;
pub mod user;

pub use purchase::{Purchase, PurchaseStatus, PurchaseWithTicket};
pub use ticket::{Ticket, TicketStatus};
pub use user::{PublicUser, User};
