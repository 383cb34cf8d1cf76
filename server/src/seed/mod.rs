//! Demo catalog loaded at startup when `SEED_SAMPLE_DATA` is set.

mod sample_data;

use crate::auth::{Identity, TokenDirectory};
use crate::store::{CatalogStore, StoreResult};

pub use sample_data::{purchase_id, ticket_id, user_id};

#[derive(Debug, Clone, Default)]
pub struct SeedSummary {
    pub users: usize,
    pub tickets: usize,
    pub purchases: usize,
    /// `(user name, bearer token)` for every demo account.
    pub tokens: Vec<(String, String)>,
}

/// Bearer token registered for the `n`th demo user.
pub fn demo_token(n: u128) -> String {
    format!("demo-token-{}", n)
}

pub fn load(catalog: &dyn CatalogStore, tokens: &TokenDirectory) -> StoreResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    for (n, user) in sample_data::users().into_iter().enumerate() {
        let token = demo_token(n as u128 + 1);
        tokens.register(
            token.clone(),
            Identity {
                id: user.id,
                name: user.name.clone(),
            },
        );
        summary.tokens.push((user.name.clone(), token));
        catalog.insert_user(user)?;
        summary.users += 1;
    }

    for ticket in sample_data::tickets() {
        catalog.insert_ticket(ticket)?;
        summary.tickets += 1;
    }

    for purchase in sample_data::purchases() {
        catalog.insert_purchase(purchase)?;
        summary.purchases += 1;
    }

    Ok(summary)
}
