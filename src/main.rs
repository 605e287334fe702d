//! Pizzeria Storefront - pizza ordering service

use std::sync::Arc;

use anyhow::Result;
use pizzeria_storefront::config::Config;
use pizzeria_storefront::http::{router, AppState};
use pizzeria_storefront::{MemoryGateway, PersistenceGateway, PgGateway};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    let config = Config::from_env()?;

    let gateway: Arc<dyn PersistenceGateway> = match &config.database_url {
        Some(url) => Arc::new(PgGateway::connect(url, config.database_max_connections).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, keeping rows in memory");
            Arc::new(MemoryGateway::with_demo_menu())
        }
    };
    let nats = match &config.nats_url {
        Some(url) => match async_nats::connect(url.as_str()).await {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "NATS unavailable, events disabled");
                None
            }
        },
        None => None,
    };

    let app = router(AppState::new(gateway, nats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("🍕 Pizzeria Storefront listening on 0.0.0.0:{}", config.port);
    axum::serve(tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?, app).await?;
    Ok(())
}
