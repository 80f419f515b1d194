//! Instructors and their weekly lesson schedules.

use chrono::Utc;
use rijschool_domain::calendar::parse_clock_time;
use rijschool_domain::Weekday;
use sqlx::SqlitePool;
use tracing::info;

use crate::entities::{
    AvailableSchedule, CreateInstructorRequest, Instructor, LessonSchedule, ScheduleUpdate,
};
use crate::ids::new_public_id;
use crate::types::{DatabaseError, DatabaseResult};

const INSTRUCTOR_COLUMNS: &str = "id, public_id, name, email, phone, is_active, created_at";
const SCHEDULE_COLUMNS: &str =
    "id, public_id, instructor_id, day_of_week, is_available, max_students, start_time, end_time";

pub const DEFAULT_MAX_STUDENTS: i64 = 5;
pub const DEFAULT_START_TIME: &str = "09:00";
pub const DEFAULT_END_TIME: &str = "17:00";

pub struct InstructorRepository {
    pool: SqlitePool,
}

impl InstructorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates an instructor with an available schedule for every weekday.
    pub async fn create(&self, request: &CreateInstructorRequest) -> DatabaseResult<Instructor> {
        let public_id = new_public_id();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO instructors (public_id, name, email, phone, is_active, created_at) \
             VALUES (?, ?, ?, ?, 1, ?)",
        )
        .bind(&public_id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
        let instructor_id = result.last_insert_rowid();

        for day in Weekday::ALL {
            sqlx::query(
                "INSERT INTO lesson_schedules (public_id, instructor_id, day_of_week, day_number, \
                 is_available, max_students, start_time, end_time) VALUES (?, ?, ?, ?, 1, ?, ?, ?)",
            )
            .bind(new_public_id())
            .bind(instructor_id)
            .bind(day.as_str())
            .bind(day.number())
            .bind(DEFAULT_MAX_STUDENTS)
            .bind(DEFAULT_START_TIME)
            .bind(DEFAULT_END_TIME)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(instructor_id, public_id = %public_id, name = %request.name, "created instructor with weekday schedules");

        self.find_by_public_id(&public_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("instructor {public_id}")))
    }

    pub async fn find_by_public_id(&self, public_id: &str) -> DatabaseResult<Option<Instructor>> {
        let sql = format!("SELECT {INSTRUCTOR_COLUMNS} FROM instructors WHERE public_id = ?");
        let instructor = sqlx::query_as::<_, Instructor>(&sql)
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(instructor)
    }

    pub async fn list_active(&self) -> DatabaseResult<Vec<Instructor>> {
        let sql = format!(
            "SELECT {INSTRUCTOR_COLUMNS} FROM instructors WHERE is_active = 1 ORDER BY name ASC"
        );
        let instructors = sqlx::query_as::<_, Instructor>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(instructors)
    }

    /// The instructor the instructor dashboard shows: the oldest active one,
    /// created with default schedules when none exists yet.
    pub async fn first_active_or_default(&self) -> DatabaseResult<Instructor> {
        let sql = format!(
            "SELECT {INSTRUCTOR_COLUMNS} FROM instructors WHERE is_active = 1 ORDER BY id ASC LIMIT 1"
        );
        if let Some(instructor) = sqlx::query_as::<_, Instructor>(&sql)
            .fetch_optional(&self.pool)
            .await?
        {
            return Ok(instructor);
        }

        info!("no active instructor found, creating the default instructor");
        self.create(&CreateInstructorRequest {
            name: "Default Instructor".to_string(),
            email: Some("instructor@rijschool.com".to_string()),
            phone: Some("+597-123-4567".to_string()),
        })
        .await
    }

    pub async fn schedules_for(&self, instructor_id: i64) -> DatabaseResult<Vec<LessonSchedule>> {
        let sql = format!(
            "SELECT {SCHEDULE_COLUMNS} FROM lesson_schedules WHERE instructor_id = ? ORDER BY day_number ASC"
        );
        let schedules = sqlx::query_as::<_, LessonSchedule>(&sql)
            .bind(instructor_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(schedules)
    }

    /// Open schedules of active instructors, Monday first.
    pub async fn list_available_schedules(&self) -> DatabaseResult<Vec<AvailableSchedule>> {
        let schedules = sqlx::query_as::<_, AvailableSchedule>(
            "SELECT s.public_id AS schedule_public_id, s.day_of_week, s.max_students, \
                    s.start_time, s.end_time, i.public_id AS instructor_public_id, \
                    i.name AS instructor_name, i.phone AS instructor_phone \
             FROM lesson_schedules s JOIN instructors i ON i.id = s.instructor_id \
             WHERE s.is_available = 1 AND i.is_active = 1 \
             ORDER BY s.day_number ASC, i.name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(schedules)
    }

    /// Applies schedule changes for one instructor atomically.
    ///
    /// Every update must name a schedule owned by `instructor_id`, keep at
    /// least one seat and describe an `HH:MM` window that ends after it starts.
    pub async fn update_schedules(
        &self,
        instructor_id: i64,
        updates: &[ScheduleUpdate],
    ) -> DatabaseResult<Vec<LessonSchedule>> {
        for update in updates {
            validate_schedule_update(update)?;
        }

        let mut tx = self.pool.begin().await?;
        for update in updates {
            let result = sqlx::query(
                "UPDATE lesson_schedules SET is_available = ?, max_students = ?, start_time = ?, \
                 end_time = ? WHERE public_id = ? AND instructor_id = ?",
            )
            .bind(update.is_available)
            .bind(update.max_students)
            .bind(update.start_time.trim())
            .bind(update.end_time.trim())
            .bind(&update.schedule_public_id)
            .bind(instructor_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(DatabaseError::NotFound(format!(
                    "schedule {}",
                    update.schedule_public_id
                )));
            }
        }
        tx.commit().await?;

        info!(instructor_id, count = updates.len(), "updated lesson schedules");
        self.schedules_for(instructor_id).await
    }
}

fn validate_schedule_update(update: &ScheduleUpdate) -> DatabaseResult<()> {
    if update.max_students < 1 {
        return Err(DatabaseError::ValidationError(
            "max students must be at least 1".to_string(),
        ));
    }
    let start = parse_clock_time(&update.start_time)
        .map_err(|e| DatabaseError::ValidationError(e.to_string()))?;
    let end = parse_clock_time(&update.end_time)
        .map_err(|e| DatabaseError::ValidationError(e.to_string()))?;
    if start >= end {
        return Err(DatabaseError::ValidationError(
            "start time must be before end time".to_string(),
        ));
    }
    Ok(())
}
