//! xrate API Server
//!
//! Serves currency conversions over rates crawled from the configured feeds.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xrate_api::{AppState, create_router};
use xrate_feed::RateService;
use xrate_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xrate=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let rate_service = RateService::from_config(&config.feed)?;
    info!(
        base = %rate_service.base_currency(),
        sources = rate_service.sources().len(),
        timeout_secs = config.feed.timeout_secs,
        max_concurrent = config.feed.max_concurrent_fetches,
        cache_ttl_secs = config.feed.cache_ttl_secs,
        "Rate service configured"
    );

    let app = create_router(AppState::new(rate_service));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
