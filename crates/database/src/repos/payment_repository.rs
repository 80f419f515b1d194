//! Append-only payment ledger.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::entities::{CreatePaymentRequest, Payment};
use crate::types::{DatabaseError, DatabaseResult};

pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, student_id: i64, request: &CreatePaymentRequest) -> DatabaseResult<Payment> {
        if request.amount_cents <= 0 {
            return Err(DatabaseError::ValidationError(
                "payment amount must be positive".to_string(),
            ));
        }

        let paid_at = request.paid_at.unwrap_or_else(Utc::now);
        let method = request
            .method
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        let result = sqlx::query(
            "INSERT INTO payments (student_id, amount_cents, method, paid_at) VALUES (?, ?, ?, ?)",
        )
        .bind(student_id)
        .bind(request.amount_cents)
        .bind(&method)
        .bind(paid_at)
        .execute(&self.pool)
        .await?;

        let payment_id = result.last_insert_rowid();
        info!(
            payment_id,
            student_id,
            amount_cents = request.amount_cents,
            "recorded payment"
        );

        Ok(Payment {
            id: payment_id,
            student_id,
            amount_cents: request.amount_cents,
            method,
            paid_at,
        })
    }

    pub async fn list_for_student(&self, student_id: i64) -> DatabaseResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT id, student_id, amount_cents, method, paid_at FROM payments \
             WHERE student_id = ? ORDER BY paid_at DESC, id DESC",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }
}
