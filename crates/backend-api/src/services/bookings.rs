use chrono::NaiveDate;
use rijschool_database::{BookingDetail, BookingRepository, BookingRequest, StatusChange};
use rijschool_notifications::{CancellationNotice, Delivery, NotificationGateway};
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::error::ServiceError;
use crate::routes::models::BookLessonBody;

/// Validates the raw request and books the lesson.
pub async fn book_lesson(
    pool: &SqlitePool,
    body: BookLessonBody,
) -> Result<BookingDetail, ServiceError> {
    let student_id = body.student_id.as_deref().map(str::trim).unwrap_or_default();
    let lesson_date = body.lesson_date.as_deref().map(str::trim).unwrap_or_default();
    if student_id.is_empty() || lesson_date.is_empty() {
        return Err(ServiceError::bad_request(
            "Student ID and lesson date are required",
        ));
    }

    let lesson_date = NaiveDate::parse_from_str(lesson_date, "%Y-%m-%d")
        .map_err(|_| ServiceError::bad_request("Invalid lesson date, expected YYYY-MM-DD"))?;
    let instructor_public_id = body
        .instructor_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());

    let repo = BookingRepository::new(pool.clone());
    let booking = repo
        .book_lesson(&BookingRequest {
            student_public_id: student_id.to_string(),
            lesson_date,
            instructor_public_id,
        })
        .await?;

    repo.find_detail(&booking.public_id)
        .await?
        .ok_or_else(|| ServiceError::internal("Booked lesson could not be read back"))
}

/// Cancels the booking and, when its status actually changed, texts the student.
///
/// Returns whether a text was delivered. Gateway failures are logged and
/// never undo the cancellation.
pub async fn cancel_booking(
    pool: &SqlitePool,
    notifier: &dyn NotificationGateway,
    booking_public_id: &str,
    cancelled_by: &str,
) -> Result<(StatusChange, bool), ServiceError> {
    let change = BookingRepository::new(pool.clone())
        .cancel(booking_public_id)
        .await?;

    if !change.changed {
        return Ok((change, false));
    }

    let contact = change.booking.student_contact.trim();
    if contact.is_empty() {
        info!(booking = %booking_public_id, "student has no contact number, skipping sms");
        return Ok((change, false));
    }

    let notice = CancellationNotice {
        recipient: contact.to_string(),
        lesson_date: change.booking.lesson_date,
        instructor_name: cancelled_by.to_string(),
    };
    let sent = match notifier.send_cancellation(&notice).await {
        Ok(delivery) => delivery == Delivery::Sent,
        Err(error) => {
            warn!(booking = %booking_public_id, %error, "failed to send cancellation sms");
            false
        }
    };

    Ok((change, sent))
}

pub async fn complete_lesson(
    pool: &SqlitePool,
    booking_public_id: &str,
) -> Result<StatusChange, ServiceError> {
    Ok(BookingRepository::new(pool.clone())
        .complete(booking_public_id)
        .await?)
}
