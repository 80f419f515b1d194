use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;

use crate::{
    routes::models::{PortalQuery, PortalResponse},
    services::portal as portal_service,
    ApiError, AppState,
};

#[utoipa::path(
    get,
    path = "/portal",
    tag = "Portal",
    params(PortalQuery),
    responses(
        (status = 200, description = "The student's progress, balance and upcoming lessons", body = PortalResponse),
        (status = 400, description = "No ID card number given", body = crate::error::ErrorResponse),
        (status = 404, description = "No student with that ID card number", body = crate::error::ErrorResponse)
    )
)]
pub async fn student_portal(
    State(state): State<AppState>,
    Query(query): Query<PortalQuery>,
) -> Result<Json<PortalResponse>, ApiError> {
    let id_card = query.id.unwrap_or_default();
    let overview =
        portal_service::student_overview(state.db_pool(), &id_card, Utc::now().date_naive())
            .await?;
    Ok(Json(overview))
}
