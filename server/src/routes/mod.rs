use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer, Config};
use crate::handlers::{self, purchases, tickets, users};
use crate::state::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/health", get(handlers::health_check))
        .nest("/api/tickets", ticket_routes())
        .nest("/api/purchases", purchase_routes())
        .nest("/api/users", user_routes())
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(config.is_production()))
        .layer(create_cors_layer(config.cors_allowed_origins.as_deref()))
        .with_state(state)
}

fn ticket_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(tickets::list_tickets).post(tickets::create_ticket))
        .route("/user/my-tickets", get(tickets::my_tickets))
        .route(
            "/:id",
            get(tickets::get_ticket)
                .put(tickets::update_ticket)
                .delete(tickets::delete_ticket),
        )
}

fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(purchases::create_purchase))
        .route("/my-purchases", get(purchases::my_purchases))
        .route("/sales/my-sales", get(purchases::my_sales))
        .route("/:id", get(purchases::get_purchase))
        .route("/:id/cancel", put(purchases::cancel_purchase))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::search_users))
        .route("/stats", get(users::my_stats))
        .route("/:id", get(users::get_user))
}
