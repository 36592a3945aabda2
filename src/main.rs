use anyhow::Context;
use booking_pricing::cache::{start_cache_warmer, AppCache};
use booking_pricing::config::Config;
use booking_pricing::{build_app, pricing::CachedHotelRates};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let cache = AppCache::new();
    tokio::spawn(start_cache_warmer(cache.clone(), pool.clone()));

    let app = build_app(
        CachedHotelRates::new(pool, cache),
        config.money_formatter(),
    );

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        locale = config.locale.code,
        persistence_scale = %config.persistence_scale,
        "Booking pricing hooks listening on http://{}",
        addr
    );
    axum::serve(listener, app).await?;

    Ok(())
}
