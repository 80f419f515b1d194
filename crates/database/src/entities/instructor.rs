use chrono::{DateTime, Utc};
use rijschool_domain::Weekday;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Instructor {
    pub id: i64,
    pub public_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateInstructorRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Weekly availability of one instructor on one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LessonSchedule {
    pub id: i64,
    pub public_id: String,
    pub instructor_id: i64,
    #[sqlx(try_from = "String")]
    pub day_of_week: Weekday,
    pub is_available: bool,
    pub max_students: i64,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleUpdate {
    pub schedule_public_id: String,
    pub is_available: bool,
    pub max_students: i64,
    pub start_time: String,
    pub end_time: String,
}

/// An available schedule joined with the instructor giving it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AvailableSchedule {
    pub schedule_public_id: String,
    #[sqlx(try_from = "String")]
    pub day_of_week: Weekday,
    pub max_students: i64,
    pub start_time: String,
    pub end_time: String,
    pub instructor_public_id: String,
    pub instructor_name: String,
    pub instructor_phone: Option<String>,
}
