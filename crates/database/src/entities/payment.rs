use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A received payment. Payments are only ever appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    pub id: i64,
    pub student_id: i64,
    pub amount_cents: i64,
    pub method: Option<String>,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub amount_cents: i64,
    pub method: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}
