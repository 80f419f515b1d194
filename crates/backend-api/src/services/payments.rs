use rijschool_database::{CreatePaymentRequest, Payment, PaymentRepository, StudentRepository};
use rijschool_domain::StudentLedger;
use sqlx::SqlitePool;
use tracing::info;

use super::error::ServiceError;
use crate::routes::models::PaymentBody;

/// Appends a payment and returns it with the student's updated ledger.
pub async fn record_payment(
    pool: &SqlitePool,
    student_public_id: &str,
    body: PaymentBody,
) -> Result<(Payment, StudentLedger), ServiceError> {
    let students = StudentRepository::new(pool.clone());
    let student = students
        .find_by_public_id(student_public_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Student not found"))?;

    let method = body
        .method
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());
    let payment = PaymentRepository::new(pool.clone())
        .create(
            student.id,
            &CreatePaymentRequest {
                amount_cents: body.amount_cents,
                method,
                paid_at: body.paid_at,
            },
        )
        .await?;

    let record = students
        .find_record(student_public_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Student not found"))?;
    let ledger = record.ledger();
    info!(
        student = %student_public_id,
        amount_cents = payment.amount_cents,
        balance_cents = ledger.balance_cents,
        "recorded payment"
    );

    Ok((payment, ledger))
}

pub async fn list_payments(
    pool: &SqlitePool,
    student_public_id: &str,
) -> Result<Vec<Payment>, ServiceError> {
    let student = StudentRepository::new(pool.clone())
        .find_by_public_id(student_public_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Student not found"))?;

    Ok(PaymentRepository::new(pool.clone())
        .list_for_student(student.id)
        .await?)
}
