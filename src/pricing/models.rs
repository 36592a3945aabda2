//! Database models for pricing queries.
//!
//! These models use sqlx's FromRow derive for direct database deserialization.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Hotel from the `hotels` table
#[derive(Debug, Clone, FromRow)]
pub struct Hotel {
    pub id: i64,
    pub name: String,
    /// Base nightly rate, before display scaling
    pub price_per_night: Decimal,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Hotel {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}
