use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Purchase, PurchaseStatus, Ticket, TicketStatus, User};

pub fn user_id(n: u128) -> Uuid {
    Uuid::from_u128(0x1000 + n)
}

pub fn ticket_id(n: u128) -> Uuid {
    Uuid::from_u128(0x2000 + n)
}

pub fn purchase_id(n: u128) -> Uuid {
    Uuid::from_u128(0x3000 + n)
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    // Every literal below is a valid UTC time.
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn pexels(photo: u32, width: u32) -> String {
    format!(
        "https://images.pexels.com/photos/{photo}/pexels-photo-{photo}.jpeg?auto=compress&cs=tinysrgb&w={width}"
    )
}

pub fn users() -> Vec<User> {
    [
        (1, "john.doe@example.com", "John Doe", 220453, at(2024, 1, 1, 10, 0)),
        (2, "jane.smith@example.com", "Jane Smith", 415829, at(2024, 1, 2, 14, 30)),
        (3, "mike.johnson@example.com", "Mike Johnson", 614810, at(2024, 1, 3, 9, 15)),
        (4, "sarah.wilson@example.com", "Sarah Wilson", 733872, at(2024, 1, 4, 16, 45)),
        (5, "alex.brown@example.com", "Alex Brown", 1222271, at(2024, 1, 5, 11, 20)),
    ]
    .into_iter()
    .map(|(n, email, name, photo, joined)| User {
        id: user_id(n),
        email: email.to_string(),
        name: name.to_string(),
        password_hash: None,
        avatar: Some(pexels(photo, 150)),
        created_at: joined,
        updated_at: joined,
    })
    .collect()
}

struct Listing {
    n: u128,
    title: &'static str,
    description: &'static str,
    category: &'static str,
    ticket_type: &'static str,
    price: Decimal,
    expiry_time: DateTime<Utc>,
    seller: (u128, &'static str),
    photo: u32,
    location: &'static str,
    available: u32,
    sold: u32,
    views: u64,
    inquiries: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Listing> for Ticket {
    fn from(l: Listing) -> Self {
        let mut ticket = Ticket {
            id: ticket_id(l.n),
            title: l.title.to_string(),
            description: l.description.to_string(),
            category: l.category.to_string(),
            ticket_type: l.ticket_type.to_string(),
            price: l.price,
            expiry_time: l.expiry_time,
            seller_id: user_id(l.seller.0),
            seller_name: l.seller.1.to_string(),
            image_url: pexels(l.photo, 800),
            location: l.location.to_string(),
            available_quantity: l.available,
            sold_quantity: l.sold,
            status: TicketStatus::Active,
            views: l.views,
            inquiries: l.inquiries,
            created_at: l.created_at,
            updated_at: l.updated_at,
        };
        ticket.sync_status();
        ticket
    }
}

pub fn tickets() -> Vec<Ticket> {
    vec![
        Listing {
            n: 1,
            title: "World Cup Cricket Final 2024",
            description: "Premium seats overlooking the pitch for the World Cup Final, refreshments included.",
            category: "cricket",
            ticket_type: "premium",
            price: Decimal::new(29999, 2),
            expiry_time: at(2024, 12, 31, 18, 0),
            seller: (1, "John Doe"),
            photo: 1661950,
            location: "Melbourne Cricket Ground, Australia",
            available: 45,
            sold: 25,
            views: 1250,
            inquiries: 45,
            created_at: at(2024, 1, 15, 10, 0),
            updated_at: at(2024, 1, 20, 14, 30),
        },
        Listing {
            n: 2,
            title: "Taylor Swift Eras Tour - VIP Experience",
            description: "VIP floor access with meet & greet and exclusive tour merchandise.",
            category: "concert",
            ticket_type: "vip",
            price: Decimal::new(45000, 2),
            expiry_time: at(2024, 11, 20, 20, 0),
            seller: (2, "Jane Smith"),
            photo: 1540406,
            location: "Madison Square Garden, New York",
            available: 15,
            sold: 85,
            views: 2890,
            inquiries: 120,
            created_at: at(2024, 1, 10, 14, 30),
            updated_at: at(2024, 1, 18, 14, 15),
        },
        Listing {
            n: 3,
            title: "Broadway Musical - Hamilton",
            description: "Orchestra seating for the award-winning musical.",
            category: "theater",
            ticket_type: "premium",
            price: Decimal::new(18000, 2),
            expiry_time: at(2024, 10, 15, 19, 30),
            seller: (3, "Mike Johnson"),
            photo: 713149,
            location: "Richard Rodgers Theatre, New York",
            available: 20,
            sold: 15,
            views: 890,
            inquiries: 32,
            created_at: at(2024, 1, 12, 9, 15),
            updated_at: at(2024, 1, 15, 9, 45),
        },
        Listing {
            n: 4,
            title: "NBA Finals Game 7 - Courtside",
            description: "Courtside seats for a deciding Game 7.",
            category: "sports",
            ticket_type: "vip",
            price: Decimal::new(89999, 2),
            expiry_time: at(2024, 6, 20, 21, 0),
            seller: (4, "Sarah Wilson"),
            photo: 1752757,
            location: "Crypto.com Arena, Los Angeles",
            available: 2,
            sold: 18,
            views: 3450,
            inquiries: 89,
            created_at: at(2024, 1, 8, 16, 45),
            updated_at: at(2024, 1, 22, 16, 20),
        },
        Listing {
            n: 5,
            title: "Comedy Night with Dave Chappelle",
            description: "An evening of stand-up in an intimate club setting.",
            category: "comedy",
            ticket_type: "premium",
            price: Decimal::new(12500, 2),
            expiry_time: at(2024, 9, 10, 20, 0),
            seller: (5, "Alex Brown"),
            photo: 1587927,
            location: "Comedy Cellar, New York",
            available: 30,
            sold: 20,
            views: 675,
            inquiries: 28,
            created_at: at(2024, 1, 20, 13, 0),
            updated_at: at(2024, 1, 25, 11, 10),
        },
        Listing {
            n: 6,
            title: "Coachella Music Festival - Weekend Pass",
            description: "Full weekend pass with VIP area access.",
            category: "concert",
            ticket_type: "vip",
            price: Decimal::new(65000, 2),
            expiry_time: at(2024, 4, 15, 12, 0),
            seller: (1, "John Doe"),
            photo: 1190298,
            location: "Empire Polo Club, California",
            available: 8,
            sold: 42,
            views: 2100,
            inquiries: 78,
            created_at: at(2024, 1, 5, 8, 0),
            updated_at: at(2024, 1, 5, 8, 0),
        },
        Listing {
            n: 7,
            title: "Super Bowl LVIII - Lower Bowl",
            description: "Lower bowl seats on the 30-yard line.",
            category: "sports",
            ticket_type: "premium",
            price: Decimal::new(120000, 2),
            expiry_time: at(2024, 2, 11, 18, 30),
            seller: (2, "Jane Smith"),
            photo: 1618200,
            location: "Allegiant Stadium, Las Vegas",
            available: 0,
            sold: 25,
            views: 4200,
            inquiries: 156,
            created_at: at(2024, 1, 1, 12, 0),
            updated_at: at(2024, 1, 1, 12, 0),
        },
        Listing {
            n: 8,
            title: "Shakespeare in the Park - Hamlet",
            description: "Open-air performance of Hamlet under the stars.",
            category: "theater",
            ticket_type: "general",
            price: Decimal::new(4500, 2),
            expiry_time: at(2024, 8, 25, 19, 0),
            seller: (3, "Mike Johnson"),
            photo: 7234216,
            location: "Delacorte Theater, Central Park",
            available: 75,
            sold: 125,
            views: 420,
            inquiries: 18,
            created_at: at(2024, 1, 18, 14, 15),
            updated_at: at(2024, 1, 18, 14, 15),
        },
    ]
    .into_iter()
    .map(Ticket::from)
    .collect()
}

pub fn purchases() -> Vec<Purchase> {
    [
        (1, 1, 2, 2, Decimal::new(59998, 2), at(2024, 1, 20, 10, 30), PurchaseStatus::Confirmed),
        (2, 2, 3, 1, Decimal::new(45000, 2), at(2024, 1, 18, 14, 15), PurchaseStatus::Confirmed),
        (3, 3, 4, 3, Decimal::new(54000, 2), at(2024, 1, 15, 9, 45), PurchaseStatus::Confirmed),
        (4, 4, 5, 1, Decimal::new(89999, 2), at(2024, 1, 22, 16, 20), PurchaseStatus::Pending),
        (5, 5, 1, 2, Decimal::new(25000, 2), at(2024, 1, 25, 11, 10), PurchaseStatus::Confirmed),
    ]
    .into_iter()
    .map(|(n, ticket, buyer, quantity, total_amount, purchase_date, status)| Purchase {
        id: purchase_id(n),
        ticket_id: ticket_id(ticket),
        buyer_id: user_id(buyer),
        quantity,
        total_amount,
        purchase_date,
        status,
    })
    .collect()
}
