//! In-memory caching using moka
//!
//! Hotel rates are read on almost every form event but change rarely,
//! so they are kept in memory and refreshed periodically.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::pricing::models::Hotel;
use crate::pricing::queries;

/// Application cache holding hotel rows
#[derive(Clone)]
pub struct AppCache {
    /// Hotels (id -> Hotel)
    pub hotels: Cache<i64, Arc<Hotel>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Hotels: 1000 entries, 15 min TTL, 5 min idle
            hotels: Cache::builder()
                .max_capacity(1000)
                .time_to_live(Duration::from_secs(15 * 60))
                .time_to_idle(Duration::from_secs(5 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hotels_size: self.hotels.entry_count(),
        }
    }

    /// Drop one hotel so its next lookup hits the database
    pub async fn invalidate_hotel(&self, hotel_id: i64) {
        self.hotels.invalidate(&hotel_id).await;
        info!("Cache invalidated for hotel: {}", hotel_id);
    }

    /// Replace the cached hotels with `hotels`.
    ///
    /// Cached ids missing from `hotels` (soft-deleted or removed) are evicted.
    pub async fn refresh_hotels(&self, hotels: Vec<Hotel>) {
        let mut active = HashSet::with_capacity(hotels.len());
        for hotel in hotels.into_iter().filter(Hotel::is_active) {
            active.insert(hotel.id);
            self.hotels.insert(hotel.id, Arc::new(hotel)).await;
        }

        let stale: Vec<i64> = self
            .hotels
            .iter()
            .map(|(id, _)| *id)
            .filter(|id| !active.contains(id))
            .collect();
        for hotel_id in stale {
            self.hotels.invalidate(&hotel_id).await;
        }
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub hotels_size: u64,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes every 10 minutes.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    let mut interval = interval(Duration::from_secs(10 * 60));
    loop {
        // First tick completes immediately
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Reload every active hotel into the cache
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    match queries::get_active_hotels(db).await {
        Ok(hotels) => cache.refresh_hotels(hotels).await,
        Err(e) => warn!("Failed to warm hotel cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}
