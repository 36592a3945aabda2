//! Pricing and money-formatting hooks for the hotel booking admin resource.

pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod pricing;
pub mod table;

use axum::{extract::State, routing::get, Json, Router};
use tower_http::trace::TraceLayer;

use crate::cache::{AppCache, CacheStats};
use crate::error::AppError;
use crate::pricing::{CachedHotelRates, HotelRateLookup, MoneyFormatter};

/// Shared state for every hook handler
#[derive(Clone)]
pub struct AppState<L> {
    pub rates: L,
    pub money: MoneyFormatter,
}

/// Full application router
pub fn build_router<L: HotelRateLookup>(state: AppState<L>, cache: AppCache) -> Router {
    let monitoring = Router::new()
        .route("/health", get(health))
        .with_state(cache);

    pricing::router::<L>()
        .fallback(|| async { AppError::NotFound })
        .with_state(state)
        .merge(monitoring)
        .layer(TraceLayer::new_for_http())
}

/// Router backed by the database and its rate cache
pub fn build_app(rates: CachedHotelRates, money: MoneyFormatter) -> Router {
    let cache = rates.cache().clone();
    build_router(AppState { rates, money }, cache)
}

async fn health(State(cache): State<AppCache>) -> Json<CacheStats> {
    Json(cache.stats())
}
