//! Lesson bookings: admission, cancellation, completion and reporting.

use chrono::{NaiveDate, Utc};
use rijschool_domain::admission::{self, BookingRejection, Transition};
use rijschool_domain::calendar::start_of_week;
use rijschool_domain::{BookingStatus, ExamStatus};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use super::transaction::WriteTransaction;
use crate::entities::{BookingDetail, BookingRequest, BookingStats, LessonBooking, StatusChange};
use crate::ids::new_public_id;
use crate::types::{BookingError, BookingResult, DatabaseResult};

const BOOKING_COLUMNS: &str =
    "id, public_id, student_id, schedule_id, lesson_date, status, created_at, updated_at";

const DETAIL_SELECT: &str = "SELECT b.public_id, b.lesson_date, b.status, s.day_of_week, \
        st.public_id AS student_public_id, st.name AS student_name, \
        st.contact AS student_contact, i.public_id AS instructor_public_id, \
        i.name AS instructor_name \
     FROM lesson_bookings b \
     JOIN lesson_schedules s ON s.id = b.schedule_id \
     JOIN instructors i ON i.id = s.instructor_id \
     JOIN students st ON st.id = b.student_id";

pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Admits and stores a booking, or explains why not.
    ///
    /// All checks and the insert run inside one `BEGIN IMMEDIATE`
    /// transaction, so two requests racing for the last seat (or for the
    /// same student and day) are decided one after the other. The partial
    /// unique index and the capacity trigger reject anything that slips
    /// past, and those failures map onto the same rejections.
    pub async fn book_lesson(&self, request: &BookingRequest) -> BookingResult<LessonBooking> {
        let mut tx = WriteTransaction::begin(&self.pool).await?;

        let outcome = admit(tx.conn()?, request).await;
        match outcome {
            Ok(booking) => {
                tx.commit().await?;
                info!(
                    booking = %booking.public_id,
                    student_id = booking.student_id,
                    schedule_id = booking.schedule_id,
                    lesson_date = %booking.lesson_date,
                    "booked lesson"
                );
                Ok(booking)
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!(error = %rollback, "failed to roll back booking transaction");
                }
                if let BookingError::Rejected(reason) = &err {
                    info!(
                        student = %request.student_public_id,
                        lesson_date = %request.lesson_date,
                        %reason,
                        "booking rejected"
                    );
                }
                Err(err)
            }
        }
    }

    pub async fn find_detail(&self, public_id: &str) -> DatabaseResult<Option<BookingDetail>> {
        let sql = format!("{DETAIL_SELECT} WHERE b.public_id = ?");
        let detail = sqlx::query_as::<_, BookingDetail>(&sql)
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(detail)
    }

    /// Cancels a booking unless the lesson was already given.
    pub async fn cancel(&self, public_id: &str) -> BookingResult<StatusChange> {
        self.transition(public_id, admission::cancellation).await
    }

    /// Marks a scheduled lesson as given.
    pub async fn complete(&self, public_id: &str) -> BookingResult<StatusChange> {
        self.transition(public_id, admission::completion).await
    }

    async fn transition(
        &self,
        public_id: &str,
        rule: fn(BookingStatus) -> Result<Transition, BookingRejection>,
    ) -> BookingResult<StatusChange> {
        let mut tx = WriteTransaction::begin(&self.pool).await?;

        let outcome = apply_transition(tx.conn()?, public_id, rule).await;
        match outcome {
            Ok(change) => {
                tx.commit().await?;
                if change.changed {
                    info!(
                        booking = %public_id,
                        status = change.booking.status.as_str(),
                        "booking status changed"
                    );
                }
                Ok(change)
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!(error = %rollback, "failed to roll back booking transaction");
                }
                Err(err)
            }
        }
    }

    pub async fn list_for_student(&self, student_id: i64) -> DatabaseResult<Vec<BookingDetail>> {
        let sql = format!("{DETAIL_SELECT} WHERE b.student_id = ? ORDER BY b.lesson_date ASC, b.id ASC");
        let bookings = sqlx::query_as::<_, BookingDetail>(&sql)
            .bind(student_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(bookings)
    }

    /// Bookings on the instructor's schedules that are still scheduled or were cancelled.
    pub async fn list_open_for_instructor(&self, instructor_id: i64) -> DatabaseResult<Vec<BookingDetail>> {
        let sql = format!(
            "{DETAIL_SELECT} WHERE s.instructor_id = ? AND b.status IN ('SCHEDULED', 'CANCELLED') \
             ORDER BY b.lesson_date ASC, b.id ASC"
        );
        let bookings = sqlx::query_as::<_, BookingDetail>(&sql)
            .bind(instructor_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(bookings)
    }

    /// Counters for the instructor dashboard, with the week starting on the
    /// Sunday on or before `today`.
    pub async fn stats_for_instructor(
        &self,
        instructor_id: i64,
        today: NaiveDate,
    ) -> DatabaseResult<BookingStats> {
        let week_start = start_of_week(today);
        let (total, this_week, cancelled, completed): (i64, i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), \
                    COALESCE(SUM(CASE WHEN b.status = 'SCHEDULED' AND b.lesson_date >= ? THEN 1 ELSE 0 END), 0), \
                    COALESCE(SUM(CASE WHEN b.status = 'CANCELLED' THEN 1 ELSE 0 END), 0), \
                    COALESCE(SUM(CASE WHEN b.status = 'COMPLETED' THEN 1 ELSE 0 END), 0) \
             FROM lesson_bookings b JOIN lesson_schedules s ON s.id = b.schedule_id \
             WHERE s.instructor_id = ?",
        )
        .bind(week_start)
        .bind(instructor_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(BookingStats {
            total_bookings: total,
            this_week_bookings: this_week,
            cancelled_bookings: cancelled,
            completed_bookings: completed,
        })
    }
}

async fn admit(conn: &mut SqliteConnection, request: &BookingRequest) -> BookingResult<LessonBooking> {
    let student: Option<(i64, String)> =
        sqlx::query_as("SELECT id, theory_status FROM students WHERE public_id = ?")
            .bind(&request.student_public_id)
            .fetch_optional(&mut *conn)
            .await?;
    let Some((student_id, theory_status)) = student else {
        return Err(BookingRejection::StudentNotFound.into());
    };

    let theory_status = theory_status
        .parse::<ExamStatus>()
        .map_err(|e| BookingError::DatabaseError(e.to_string()))?;
    admission::check_theory(theory_status)?;

    let weekday = admission::check_weekday(request.lesson_date)?;

    let schedule: Option<(i64, i64)> = match request.instructor_public_id.as_deref() {
        Some(instructor) => {
            sqlx::query_as(
                "SELECT s.id, s.max_students FROM lesson_schedules s \
                 JOIN instructors i ON i.id = s.instructor_id \
                 WHERE s.day_of_week = ? AND s.is_available = 1 AND i.is_active = 1 \
                   AND i.public_id = ? \
                 LIMIT 1",
            )
            .bind(weekday.as_str())
            .bind(instructor)
            .fetch_optional(&mut *conn)
            .await?
        }
        None => {
            sqlx::query_as(
                "SELECT s.id, s.max_students FROM lesson_schedules s \
                 JOIN instructors i ON i.id = s.instructor_id \
                 WHERE s.day_of_week = ? AND s.is_available = 1 AND i.is_active = 1 \
                 ORDER BY s.instructor_id ASC LIMIT 1",
            )
            .bind(weekday.as_str())
            .fetch_optional(&mut *conn)
            .await?
        }
    };
    let Some((schedule_id, max_students)) = schedule else {
        return Err(BookingRejection::NoInstructorAvailable.into());
    };

    let (seats_taken,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM lesson_bookings \
         WHERE schedule_id = ? AND lesson_date = ? AND status != 'CANCELLED'",
    )
    .bind(schedule_id)
    .bind(request.lesson_date)
    .fetch_one(&mut *conn)
    .await?;
    admission::check_capacity(seats_taken, max_students)?;

    let (same_day,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM lesson_bookings \
         WHERE student_id = ? AND lesson_date = ? AND status != 'CANCELLED'",
    )
    .bind(student_id)
    .bind(request.lesson_date)
    .fetch_one(&mut *conn)
    .await?;
    admission::check_not_double_booked(same_day)?;

    let now = Utc::now();
    let sql = format!(
        "INSERT INTO lesson_bookings (public_id, student_id, schedule_id, lesson_date, status, \
         created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {BOOKING_COLUMNS}"
    );
    let booking = sqlx::query_as::<_, LessonBooking>(&sql)
        .bind(new_public_id())
        .bind(student_id)
        .bind(schedule_id)
        .bind(request.lesson_date)
        .bind(BookingStatus::Scheduled.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

    Ok(booking)
}

async fn apply_transition(
    conn: &mut SqliteConnection,
    public_id: &str,
    rule: fn(BookingStatus) -> Result<Transition, BookingRejection>,
) -> BookingResult<StatusChange> {
    let sql = format!("{DETAIL_SELECT} WHERE b.public_id = ?");
    let Some(mut booking) = sqlx::query_as::<_, BookingDetail>(&sql)
        .bind(public_id)
        .fetch_optional(&mut *conn)
        .await?
    else {
        return Err(BookingRejection::BookingNotFound.into());
    };

    let changed = match rule(booking.status)? {
        Transition::Unchanged => false,
        Transition::Apply(next) => {
            sqlx::query("UPDATE lesson_bookings SET status = ?, updated_at = ? WHERE public_id = ?")
                .bind(next.as_str())
                .bind(Utc::now())
                .bind(public_id)
                .execute(&mut *conn)
                .await?;
            booking.status = next;
            true
        }
    };

    Ok(StatusChange { booking, changed })
}
