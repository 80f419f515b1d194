//! Settings repository for the singleton settings row.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::entities::{Setting, DEFAULT_PRICE_CENTS};
use crate::types::{DatabaseError, DatabaseResult};

pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns the settings row, creating it with the default price on first use.
    pub async fn get_or_create(&self) -> DatabaseResult<Setting> {
        sqlx::query(
            "INSERT INTO settings (id, default_price_cents, updated_at) VALUES (1, ?, ?) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(DEFAULT_PRICE_CENTS)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let setting = sqlx::query_as::<_, Setting>(
            "SELECT id, default_price_cents, updated_at FROM settings WHERE id = 1",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(setting)
    }

    pub async fn update_default_price(&self, default_price_cents: i64) -> DatabaseResult<Setting> {
        if default_price_cents < 0 {
            return Err(DatabaseError::ValidationError(
                "default price cannot be negative".to_string(),
            ));
        }

        let setting = sqlx::query_as::<_, Setting>(
            "INSERT INTO settings (id, default_price_cents, updated_at) VALUES (1, ?, ?) \
             ON CONFLICT (id) DO UPDATE SET default_price_cents = excluded.default_price_cents, \
               updated_at = excluded.updated_at \
             RETURNING id, default_price_cents, updated_at",
        )
        .bind(default_price_cents)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!(default_price_cents, "updated default price");
        Ok(setting)
    }
}
