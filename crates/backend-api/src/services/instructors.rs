use std::collections::HashMap;

use chrono::NaiveDate;
use rijschool_database::{
    AvailableSchedule, BookingDetail, BookingRepository, CreateInstructorRequest, DatabaseError,
    Instructor, InstructorRepository, LessonSchedule, ScheduleUpdate, StudentQuery,
    StudentRepository,
};
use sqlx::SqlitePool;

use super::error::ServiceError;
use crate::routes::models::{
    InstructorBody, InstructorDataResponse, InstructorStudent, ScheduleUpdateBody,
};

pub async fn list_instructors(pool: &SqlitePool) -> Result<Vec<Instructor>, ServiceError> {
    Ok(InstructorRepository::new(pool.clone()).list_active().await?)
}

pub async fn create_instructor(
    pool: &SqlitePool,
    body: InstructorBody,
) -> Result<(Instructor, Vec<LessonSchedule>), ServiceError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ServiceError::bad_request("Name is required"));
    }
    let optional = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let repo = InstructorRepository::new(pool.clone());
    let instructor = repo
        .create(&CreateInstructorRequest {
            name: name.to_string(),
            email: optional(body.email),
            phone: optional(body.phone),
        })
        .await?;
    let schedules = repo.schedules_for(instructor.id).await?;
    Ok((instructor, schedules))
}

/// Everything the instructor dashboard shows for the active instructor.
///
/// Students are listed newest registration first, each with their
/// scheduled and cancelled lessons on this instructor's schedules.
pub async fn instructor_data(
    pool: &SqlitePool,
    today: NaiveDate,
) -> Result<InstructorDataResponse, ServiceError> {
    let instructors = InstructorRepository::new(pool.clone());
    let instructor = instructors.first_active_or_default().await?;
    let schedules = instructors.schedules_for(instructor.id).await?;

    let bookings_repo = BookingRepository::new(pool.clone());
    let mut bookings: HashMap<String, Vec<BookingDetail>> = HashMap::new();
    for booking in bookings_repo.list_open_for_instructor(instructor.id).await? {
        bookings
            .entry(booking.student_public_id.clone())
            .or_default()
            .push(booking);
    }

    let students = StudentRepository::new(pool.clone())
        .list(&StudentQuery::default())
        .await?
        .into_iter()
        .map(|student| InstructorStudent {
            bookings: bookings.remove(&student.public_id).unwrap_or_default(),
            registration_id: student.registration_id(),
            public_id: student.public_id,
            name: student.name,
            registered_at: student.registered_at,
        })
        .collect();

    let stats = bookings_repo
        .stats_for_instructor(instructor.id, today)
        .await?;

    Ok(InstructorDataResponse {
        instructor,
        schedules,
        students,
        stats,
    })
}

pub async fn update_schedule(
    pool: &SqlitePool,
    instructor_public_id: &str,
    body: ScheduleUpdateBody,
) -> Result<(Instructor, Vec<LessonSchedule>), ServiceError> {
    let repo = InstructorRepository::new(pool.clone());
    let instructor = repo
        .find_by_public_id(instructor_public_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Instructor not found"))?;

    let updates: Vec<ScheduleUpdate> = body
        .schedules
        .into_iter()
        .map(|item| ScheduleUpdate {
            schedule_public_id: item.id,
            is_available: item.is_available,
            max_students: item.max_students,
            start_time: item.start_time,
            end_time: item.end_time,
        })
        .collect();

    let schedules = repo
        .update_schedules(instructor.id, &updates)
        .await
        .map_err(|err| match err {
            DatabaseError::NotFound(_) => ServiceError::not_found("Schedule not found"),
            other => other.into(),
        })?;
    Ok((instructor, schedules))
}

pub async fn available_schedules(
    pool: &SqlitePool,
) -> Result<(Vec<AvailableSchedule>, Vec<Instructor>), ServiceError> {
    let repo = InstructorRepository::new(pool.clone());
    let schedules = repo.list_available_schedules().await?;
    let instructors = repo.list_active().await?;
    Ok((schedules, instructors))
}
