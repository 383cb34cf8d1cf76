//! Ticket browsing: filter, sort, paginate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::models::{Ticket, TicketStatus};
use crate::utils::error::AppError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;

/// Query string accepted by `GET /api/tickets`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub ticket_type: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub location: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    Description,
    Category,
    TicketType,
    Price,
    CreatedAt,
    UpdatedAt,
    ExpiryTime,
    SellerId,
    SellerName,
    ImageUrl,
    Location,
    AvailableQuantity,
    SoldQuantity,
    Status,
    Views,
    Inquiries,
    /// Not a ticket field; every pair compares equal.
    Unknown,
}

impl SortField {
    /// Resolves a `sortBy` value, accepting both snake_case and camelCase.
    pub fn named(name: &str) -> Self {
        match name {
            "id" => SortField::Id,
            "title" => SortField::Title,
            "description" => SortField::Description,
            "category" => SortField::Category,
            "type" | "ticket_type" | "ticketType" => SortField::TicketType,
            "price" => SortField::Price,
            "created_at" | "createdAt" => SortField::CreatedAt,
            "updated_at" | "updatedAt" => SortField::UpdatedAt,
            "expiry_time" | "expiryTime" => SortField::ExpiryTime,
            "seller_id" | "sellerId" => SortField::SellerId,
            "seller_name" | "sellerName" => SortField::SellerName,
            "image_url" | "imageUrl" => SortField::ImageUrl,
            "location" => SortField::Location,
            "available_quantity" | "availableQuantity" => SortField::AvailableQuantity,
            "sold_quantity" | "soldQuantity" => SortField::SoldQuantity,
            "status" => SortField::Status,
            "views" => SortField::Views,
            "inquiries" => SortField::Inquiries,
            _ => SortField::Unknown,
        }
    }

    fn compare(&self, a: &Ticket, b: &Ticket) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Description => a.description.cmp(&b.description),
            SortField::Category => a.category.cmp(&b.category),
            SortField::TicketType => a.ticket_type.cmp(&b.ticket_type),
            SortField::Price => a.price.cmp(&b.price),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::ExpiryTime => a.expiry_time.cmp(&b.expiry_time),
            SortField::SellerId => a.seller_id.cmp(&b.seller_id),
            SortField::SellerName => a.seller_name.cmp(&b.seller_name),
            SortField::ImageUrl => a.image_url.cmp(&b.image_url),
            SortField::Location => a.location.cmp(&b.location),
            SortField::AvailableQuantity => a.available_quantity.cmp(&b.available_quantity),
            SortField::SoldQuantity => a.sold_quantity.cmp(&b.sold_quantity),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
            SortField::Views => a.views.cmp(&b.views),
            SortField::Inquiries => a.inquiries.cmp(&b.inquiries),
            SortField::Unknown => Ordering::Equal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(AppError::ValidationError(format!(
                "Sort order must be 'asc' or 'desc', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: usize,
    pub items_per_page: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketPage {
    pub tickets: Vec<Ticket>,
    pub pagination: Pagination,
}

/// Parsed, validated form of a [`ListingQuery`].
#[derive(Debug, Clone)]
struct Plan {
    category: Option<String>,
    ticket_type: Option<String>,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
    location: Option<String>,
    search: Option<String>,
    status: Option<TicketStatus>,
    sort_field: SortField,
    sort_order: SortOrder,
    page: u32,
    limit: u32,
}

impl TryFrom<&ListingQuery> for Plan {
    type Error = AppError;

    fn try_from(query: &ListingQuery) -> Result<Self, Self::Error> {
        let page = query.page.unwrap_or(DEFAULT_PAGE);
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
        if page == 0 || limit == 0 {
            return Err(AppError::ValidationError(
                "Page and limit must be at least 1".to_string(),
            ));
        }

        // "all" is the frontend's way of saying "no filter".
        let status = match non_blank(&query.status).as_deref() {
            None => Some(TicketStatus::Active),
            Some("all") => None,
            Some(raw) => Some(raw.parse().map_err(AppError::ValidationError)?),
        };

        Ok(Self {
            category: non_blank(&query.category).filter(|c| c != "all"),
            ticket_type: non_blank(&query.ticket_type).filter(|t| t != "all"),
            min_price: price_bound(&query.min_price, "minPrice")?,
            max_price: price_bound(&query.max_price, "maxPrice")?,
            location: non_blank(&query.location).map(|l| l.to_lowercase()),
            search: non_blank(&query.search).map(|s| s.to_lowercase()),
            status,
            sort_field: non_blank(&query.sort_by)
                .as_deref()
                .map_or(SortField::CreatedAt, SortField::named),
            sort_order: non_blank(&query.sort_order)
                .as_deref()
                .map_or(Ok(SortOrder::Desc), str::parse)?,
            page,
            limit,
        })
    }
}

impl Plan {
    fn matches(&self, ticket: &Ticket) -> bool {
        if self.category.as_ref().is_some_and(|c| &ticket.category != c) {
            return false;
        }
        if self
            .ticket_type
            .as_ref()
            .is_some_and(|t| &ticket.ticket_type != t)
        {
            return false;
        }
        if self.min_price.is_some_and(|min| ticket.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| ticket.price > max) {
            return false;
        }
        if let Some(location) = &self.location {
            if !ticket.location.to_lowercase().contains(location) {
                return false;
            }
        }
        if let Some(needle) = &self.search {
            let hit = [&ticket.title, &ticket.description, &ticket.location]
                .iter()
                .any(|field| field.to_lowercase().contains(needle));
            if !hit {
                return false;
            }
        }
        self.status.map_or(true, |status| ticket.status == status)
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A blank bound means no bound.
fn price_bound(value: &Option<String>, name: &str) -> Result<Option<Decimal>, AppError> {
    non_blank(value)
        .map(|raw| {
            Decimal::from_str(&raw).map_err(|_| {
                AppError::ValidationError(format!("{} must be a number, got '{}'", name, raw))
            })
        })
        .transpose()
}

/// Runs `query` over `tickets`, which must be in insertion order.
///
/// Sorting is stable, so tickets with equal keys keep their relative order.
pub fn search(tickets: Vec<Ticket>, query: &ListingQuery) -> Result<TicketPage, AppError> {
    let plan = Plan::try_from(query)?;

    let mut matched: Vec<Ticket> = tickets.into_iter().filter(|t| plan.matches(t)).collect();
    matched.sort_by(|a, b| match plan.sort_order {
        SortOrder::Asc => plan.sort_field.compare(a, b),
        SortOrder::Desc => plan.sort_field.compare(b, a),
    });

    let total_items = matched.len();
    let limit = plan.limit as usize;
    let total_pages = total_items.div_ceil(limit);
    let start = (plan.page as usize - 1).saturating_mul(limit);

    let tickets = matched.into_iter().skip(start).take(limit).collect();

    Ok(TicketPage {
        tickets,
        pagination: Pagination {
            current_page: plan.page,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            total_items,
            items_per_page: plan.limit,
        },
    })
}
