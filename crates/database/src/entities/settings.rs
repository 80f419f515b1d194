//! The singleton settings row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Price applied to new registrations when none is given: SRD 2500,00.
pub const DEFAULT_PRICE_CENTS: i64 = 250_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Setting {
    pub id: i64,
    pub default_price_cents: i64,
    pub updated_at: DateTime<Utc>,
}
