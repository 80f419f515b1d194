use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    routes::models::{DashboardQuery, DashboardResponse, SettingsBody, SettingsResponse},
    services::dashboard as dashboard_service,
    ApiError, AppState,
};

#[utoipa::path(
    get,
    path = "/admin/dashboard",
    tag = "Dashboard",
    security(("sessionToken" = [])),
    params(DashboardQuery),
    responses(
        (status = 200, description = "Payment totals across all students", body = DashboardResponse),
        (status = 400, description = "Month is not YYYY-MM", body = crate::error::ErrorResponse)
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let (totals, month) =
        dashboard_service::dashboard(state.db_pool(), query.month.as_deref()).await?;

    Ok(Json(DashboardResponse {
        total_students: totals.total_students,
        total_received: totals.total_received_cents,
        month_filtered_received: totals.month_received_cents,
        total_outstanding: totals.total_outstanding_cents,
        month: month.map(|m| m.to_string()),
    }))
}

#[utoipa::path(
    get,
    path = "/admin/settings",
    tag = "Dashboard",
    security(("sessionToken" = [])),
    responses((status = 200, description = "School settings", body = SettingsResponse))
)]
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let settings = dashboard_service::get_settings(state.db_pool()).await?;
    Ok(Json(SettingsResponse { settings }))
}

#[utoipa::path(
    put,
    path = "/admin/settings",
    tag = "Dashboard",
    security(("sessionToken" = [])),
    request_body = SettingsBody,
    responses(
        (status = 200, description = "Settings updated", body = SettingsResponse),
        (status = 400, description = "Negative price", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(body): Json<SettingsBody>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let settings =
        dashboard_service::update_settings(state.db_pool(), body.default_price_cents).await?;
    Ok(Json(SettingsResponse { settings }))
}
