/// Taskdeck API server entry point

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskdeck_api::app::{build_router, AppState};
use taskdeck_api::build_authenticator;
use taskdeck_api::config::{AuthStrategy, Config};
use taskdeck_shared::db::migrations::run_migrations;
use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("taskdeck_api=info,taskdeck_shared=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    tracing::info!(
        version = taskdeck_shared::VERSION,
        strategy = match config.auth.strategy {
            AuthStrategy::Session => "session",
            AuthStrategy::Token => "token",
        },
        "starting taskdeck-api"
    );

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await
    .context("failed to connect to database")?;

    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let authenticator = build_authenticator(&config.auth)?;

    let bind_address = config.bind_address();
    let state = AppState {
        db: pool,
        config: Arc::new(config),
        authenticator,
    };

    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;

    tracing::info!(address = %bind_address, "listening");

    axum::serve(listener, router)
        .await
        .context("server error")?;

    Ok(())
}
