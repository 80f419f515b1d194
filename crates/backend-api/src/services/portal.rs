use chrono::NaiveDate;
use rijschool_database::{BookingRepository, StudentRepository};
use rijschool_domain::BookingStatus;
use sqlx::SqlitePool;

use super::error::ServiceError;
use crate::routes::models::PortalResponse;

/// A student's own view, looked up by ID card number.
///
/// Upcoming lessons are scheduled lessons on or after `today`.
pub async fn student_overview(
    pool: &SqlitePool,
    id_card_number: &str,
    today: NaiveDate,
) -> Result<PortalResponse, ServiceError> {
    let id_card_number = id_card_number.trim();
    if id_card_number.is_empty() {
        return Err(ServiceError::bad_request("ID card number is required"));
    }

    let students = StudentRepository::new(pool.clone());
    let student = students
        .find_by_id_card(id_card_number)
        .await?
        .ok_or_else(|| ServiceError::not_found("No student found for that ID Card Number"))?;
    let record = students
        .find_record(&student.public_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("No student found for that ID Card Number"))?;
    let ledger = record.ledger();

    let bookings = BookingRepository::new(pool.clone())
        .list_for_student(student.id)
        .await?;
    let completed_lessons = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Completed)
        .count();
    let upcoming_lessons = bookings
        .into_iter()
        .filter(|b| b.status == BookingStatus::Scheduled && b.lesson_date >= today)
        .collect();

    Ok(PortalResponse {
        public_id: student.public_id.clone(),
        registration_id: student.registration_id(),
        name: student.name.clone(),
        license_category: student.license_category,
        theory_status: student.theory_status,
        theory_date: student.theory_date,
        practical_status: student.practical_status,
        practical_date: student.practical_date,
        may_book_lessons: student.exams().may_book_practical_lessons(),
        agreed_price_cents: student.agreed_price_cents,
        paid_cents: ledger.paid_cents,
        balance_cents: ledger.balance_cents,
        completed_lessons,
        upcoming_lessons,
    })
}
