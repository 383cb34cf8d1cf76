use dotenvy::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use tickethub_server::auth::TokenDirectory;
use tickethub_server::config::Config;
use tickethub_server::routes::create_routes;
use tickethub_server::seed;
use tickethub_server::state::AppState;
use tickethub_server::store::InMemoryCatalog;
use tickethub_server::utils::clock::SystemClock;
use tickethub_server::utils::error::expose_internal_details;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tickethub_server=debug,tower_http=info")),
        )
        .init();

    let config = Config::from_env();
    expose_internal_details(config.is_development());
    tracing::info!(environment = %config.rust_env, "Starting TicketHub API");

    let catalog = Arc::new(InMemoryCatalog::new());
    let tokens = Arc::new(TokenDirectory::new());

    if config.seed_sample_data {
        let seeded = seed::load(catalog.as_ref(), &tokens).expect("Failed to seed sample data");
        tracing::info!(
            users = seeded.users,
            tickets = seeded.tickets,
            purchases = seeded.purchases,
            "Sample data loaded"
        );
        if config.is_development() {
            for (name, token) in &seeded.tokens {
                tracing::info!(user = %name, token = %token, "Demo bearer token");
            }
        }
    }

    let state = AppState::new(
        catalog,
        tokens,
        Arc::new(SystemClock),
        config.cancellation_window(),
    );
    tracing::info!(
        cancellation_window_hours = state.inventory.cancellation_window().num_hours(),
        "Inventory engine ready"
    );
    let app = create_routes(state, &config);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    tracing::info!("🚀 TicketHub API running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");

    tracing::info!("Server closed");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("SIGINT received, shutting down gracefully"),
        _ = terminate => tracing::info!("SIGTERM received, shutting down gracefully"),
    }
}
