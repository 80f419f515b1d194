use chrono::{DateTime, NaiveDate, Utc};
use rijschool_domain::{BookingStatus, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LessonBooking {
    pub id: i64,
    pub public_id: String,
    pub student_id: i64,
    pub schedule_id: i64,
    pub lesson_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub student_public_id: String,
    pub lesson_date: NaiveDate,
    /// Restrict the search to one instructor; any available instructor otherwise.
    pub instructor_public_id: Option<String>,
}

/// A booking with the people involved, as shown to instructors and students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BookingDetail {
    pub public_id: String,
    pub lesson_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    #[sqlx(try_from = "String")]
    pub day_of_week: Weekday,
    pub student_public_id: String,
    pub student_name: String,
    pub student_contact: String,
    pub instructor_public_id: String,
    pub instructor_name: String,
}

/// Result of a cancel or complete request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub booking: BookingDetail,
    /// False when the booking already had the requested status.
    pub changed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookingStats {
    pub total_bookings: i64,
    pub this_week_bookings: i64,
    pub cancelled_bookings: i64,
    pub completed_bookings: i64,
}
