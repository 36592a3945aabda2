//! Database queries for hotel rates.

use sqlx::PgPool;

use crate::error::AppError;

use super::models::Hotel;

/// Find an active hotel by id
pub async fn find_hotel(pool: &PgPool, hotel_id: i64) -> Result<Option<Hotel>, AppError> {
    let hotel = sqlx::query_as::<_, Hotel>(
        r#"
        SELECT id, name, price_per_night, deleted_at
        FROM hotels
        WHERE id = $1
          AND deleted_at IS NULL
        "#,
    )
    .bind(hotel_id)
    .fetch_optional(pool)
    .await?;

    Ok(hotel)
}

/// Get all active hotels (for cache warming)
pub async fn get_active_hotels(pool: &PgPool) -> Result<Vec<Hotel>, AppError> {
    let hotels = sqlx::query_as::<_, Hotel>(
        r#"
        SELECT id, name, price_per_night, deleted_at
        FROM hotels
        WHERE deleted_at IS NULL
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(hotels)
}
