use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use crate::{
    routes::models::{
        InstructorBody, InstructorDataResponse, InstructorResponse, InstructorsResponse,
        ScheduleUpdateBody, SchedulesResponse,
    },
    services::instructors as instructor_service,
    ApiError, AppState,
};

#[utoipa::path(
    get,
    path = "/admin/instructors",
    tag = "Instructors",
    security(("sessionToken" = [])),
    responses((status = 200, description = "Active instructors", body = InstructorsResponse))
)]
pub async fn list_instructors(
    State(state): State<AppState>,
) -> Result<Json<InstructorsResponse>, ApiError> {
    let instructors = instructor_service::list_instructors(state.db_pool()).await?;
    Ok(Json(InstructorsResponse { instructors }))
}

#[utoipa::path(
    post,
    path = "/admin/instructors",
    tag = "Instructors",
    security(("sessionToken" = [])),
    request_body = InstructorBody,
    responses(
        (status = 200, description = "Instructor created with weekday schedules", body = InstructorResponse),
        (status = 400, description = "Missing name", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_instructor(
    State(state): State<AppState>,
    Json(body): Json<InstructorBody>,
) -> Result<Json<InstructorResponse>, ApiError> {
    let (instructor, schedules) =
        instructor_service::create_instructor(state.db_pool(), body).await?;
    Ok(Json(InstructorResponse {
        instructor,
        schedules,
    }))
}

#[utoipa::path(
    get,
    path = "/instructor/data",
    tag = "Instructors",
    security(("sessionToken" = [])),
    responses(
        (status = 200, description = "Instructor dashboard", body = InstructorDataResponse),
        (status = 303, description = "Not signed in as instructor; redirected to /instructor/login")
    )
)]
pub async fn instructor_data(
    State(state): State<AppState>,
) -> Result<Json<InstructorDataResponse>, ApiError> {
    let today = Utc::now().date_naive();
    let data = instructor_service::instructor_data(state.db_pool(), today)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load instructor data: {}", e);
            ApiError::from(e)
        })?;
    Ok(Json(data))
}

#[utoipa::path(
    put,
    path = "/instructor/{instructor_id}/schedule",
    tag = "Instructors",
    security(("sessionToken" = [])),
    params(("instructor_id" = String, Path, description = "Instructor public identifier")),
    request_body = ScheduleUpdateBody,
    responses(
        (status = 200, description = "Updated weekly schedule", body = InstructorResponse),
        (status = 400, description = "Invalid times or capacity", body = crate::error::ErrorResponse),
        (status = 404, description = "Instructor or schedule not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(instructor_id): Path<String>,
    Json(body): Json<ScheduleUpdateBody>,
) -> Result<Json<InstructorResponse>, ApiError> {
    let (instructor, schedules) =
        instructor_service::update_schedule(state.db_pool(), &instructor_id, body).await?;

    Ok(Json(InstructorResponse {
        instructor,
        schedules,
    }))
}

async fn schedules(state: &AppState) -> Result<Json<SchedulesResponse>, ApiError> {
    let (schedules, instructors) = instructor_service::available_schedules(state.db_pool()).await?;
    Ok(Json(SchedulesResponse {
        schedules,
        instructors,
    }))
}

#[utoipa::path(
    get,
    path = "/instructor/schedules",
    tag = "Instructors",
    security(("sessionToken" = [])),
    responses((status = 200, description = "Open lesson schedules", body = SchedulesResponse))
)]
pub async fn instructor_schedules(
    State(state): State<AppState>,
) -> Result<Json<SchedulesResponse>, ApiError> {
    schedules(&state).await
}

#[utoipa::path(
    get,
    path = "/portal/schedules",
    tag = "Portal",
    responses((status = 200, description = "Open lesson schedules", body = SchedulesResponse))
)]
pub async fn portal_schedules(
    State(state): State<AppState>,
) -> Result<Json<SchedulesResponse>, ApiError> {
    schedules(&state).await
}
