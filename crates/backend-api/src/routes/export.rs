use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::{services::export as export_service, ApiError, AppState};

#[utoipa::path(
    get,
    path = "/admin/export/students",
    tag = "Students",
    security(("sessionToken" = [])),
    responses(
        (status = 200, description = "All students as CSV", content_type = "text/csv", body = String)
    )
)]
pub async fn export_students(State(state): State<AppState>) -> Result<Response, ApiError> {
    let csv = export_service::export_students(state.db_pool())
        .await
        .map_err(|e| {
            tracing::error!("Failed to export students: {}", e);
            ApiError::from(e)
        })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"students.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
