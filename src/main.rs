// src/main.rs

use std::sync::Arc;

use testhub::auth::LocalIdentityProvider;
use testhub::config::Config;
use testhub::models::user::Role;
use testhub::routes;
use testhub::state::AppState;
use testhub::store::MemoryStore;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load configuration from environment (.env included)
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let identity = LocalIdentityProvider::from_config(&config);

    // Seed Admin User
    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        match identity.seed_account(email, password, Role::Admin).await {
            Ok(user) => tracing::info!(user_id = %user.id, "Admin account ready: {}", email),
            Err(e) => tracing::error!("Failed to seed admin account: {}", e),
        }
    }

    let store = if config.seed_fixtures {
        tracing::info!("Seeding demo tests and sections");
        MemoryStore::seeded(config.simulated_latency())
    } else {
        MemoryStore::new(config.simulated_latency())
    };

    tracing::debug!("Simulated API latency: {:?}", store.latency());

    let state = AppState {
        store,
        config: config.clone(),
        identity: Arc::new(identity),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", config.bind_addr, e);
            return;
        }
    };
    tracing::info!("Listening on {}", config.bind_addr);

    // Start the server
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}
