use axum::{
    extract::{Path, State},
    Extension, Json,
};
use rijschool_auth::SessionContext;

use crate::{
    routes::models::{BookLessonBody, BookLessonResponse, BookingStatusResponse},
    services::bookings as booking_service,
    ApiError, AppState,
};

#[utoipa::path(
    post,
    path = "/portal/lessons/book",
    tag = "Bookings",
    request_body = BookLessonBody,
    responses(
        (status = 200, description = "Lesson booked", body = BookLessonResponse),
        (status = 400, description = "Booking refused; the message names the reason", body = crate::error::ErrorResponse),
        (status = 404, description = "Student not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn book_lesson(
    State(state): State<AppState>,
    Json(body): Json<BookLessonBody>,
) -> Result<Json<BookLessonResponse>, ApiError> {
    let booking = booking_service::book_lesson(state.db_pool(), body).await?;

    Ok(Json(BookLessonResponse {
        success: true,
        message: "Lesson booked successfully".to_string(),
        booking,
    }))
}

#[utoipa::path(
    post,
    path = "/instructor/bookings/{booking_id}/cancel",
    tag = "Bookings",
    security(("sessionToken" = [])),
    params(("booking_id" = String, Path, description = "Booking public identifier")),
    responses(
        (status = 200, description = "Booking cancelled; the student is texted when possible", body = BookingStatusResponse),
        (status = 400, description = "Completed lessons cannot be cancelled", body = crate::error::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(booking_id): Path<String>,
) -> Result<Json<BookingStatusResponse>, ApiError> {
    let (change, notification_sent) = booking_service::cancel_booking(
        state.db_pool(),
        state.notifier(),
        &booking_id,
        &session.display_name,
    )
    .await?;

    let message = if change.changed {
        "Lesson cancelled"
    } else {
        "Lesson was already cancelled"
    };
    Ok(Json(BookingStatusResponse {
        success: true,
        message: message.to_string(),
        changed: change.changed,
        booking: change.booking,
        notification_sent: Some(notification_sent),
    }))
}

#[utoipa::path(
    post,
    path = "/instructor/lessons/{booking_id}/complete",
    tag = "Bookings",
    security(("sessionToken" = [])),
    params(("booking_id" = String, Path, description = "Booking public identifier")),
    responses(
        (status = 200, description = "Lesson marked as completed", body = BookingStatusResponse),
        (status = 400, description = "Cancelled lessons cannot be completed", body = crate::error::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn complete_lesson(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<BookingStatusResponse>, ApiError> {
    let change = booking_service::complete_lesson(state.db_pool(), &booking_id).await?;

    let message = if change.changed {
        "Lesson marked as completed"
    } else {
        "Lesson was already completed"
    };
    Ok(Json(BookingStatusResponse {
        success: true,
        message: message.to_string(),
        changed: change.changed,
        booking: change.booking,
        notification_sent: None,
    }))
}
