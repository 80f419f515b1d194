use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    routes::models::{NewsletterBody, NewsletterResponse, NewslettersResponse, SuccessResponse},
    services::newsletters as newsletter_service,
    ApiError, AppState,
};

#[utoipa::path(
    get,
    path = "/admin/newsletters",
    tag = "Newsletters",
    security(("sessionToken" = [])),
    responses((status = 200, description = "All newsletters, newest first", body = NewslettersResponse))
)]
pub async fn list_newsletters(
    State(state): State<AppState>,
) -> Result<Json<NewslettersResponse>, ApiError> {
    let newsletters = newsletter_service::list_newsletters(state.db_pool()).await?;
    Ok(Json(NewslettersResponse { newsletters }))
}

#[utoipa::path(
    post,
    path = "/admin/newsletters",
    tag = "Newsletters",
    security(("sessionToken" = [])),
    request_body = NewsletterBody,
    responses(
        (status = 200, description = "Newsletter created", body = NewsletterResponse),
        (status = 400, description = "Missing title or content", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_newsletter(
    State(state): State<AppState>,
    Json(body): Json<NewsletterBody>,
) -> Result<Json<NewsletterResponse>, ApiError> {
    let newsletter = newsletter_service::create_newsletter(state.db_pool(), body).await?;
    Ok(Json(NewsletterResponse { newsletter }))
}

#[utoipa::path(
    post,
    path = "/admin/newsletters/{newsletter_id}/publish",
    tag = "Newsletters",
    security(("sessionToken" = [])),
    params(("newsletter_id" = String, Path, description = "Newsletter public identifier")),
    responses(
        (status = 200, description = "Newsletter published", body = NewsletterResponse),
        (status = 404, description = "Newsletter not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn publish_newsletter(
    State(state): State<AppState>,
    Path(newsletter_id): Path<String>,
) -> Result<Json<NewsletterResponse>, ApiError> {
    let newsletter =
        newsletter_service::set_published(state.db_pool(), &newsletter_id, true).await?;
    Ok(Json(NewsletterResponse { newsletter }))
}

#[utoipa::path(
    post,
    path = "/admin/newsletters/{newsletter_id}/unpublish",
    tag = "Newsletters",
    security(("sessionToken" = [])),
    params(("newsletter_id" = String, Path, description = "Newsletter public identifier")),
    responses(
        (status = 200, description = "Newsletter withdrawn", body = NewsletterResponse),
        (status = 404, description = "Newsletter not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn unpublish_newsletter(
    State(state): State<AppState>,
    Path(newsletter_id): Path<String>,
) -> Result<Json<NewsletterResponse>, ApiError> {
    let newsletter =
        newsletter_service::set_published(state.db_pool(), &newsletter_id, false).await?;
    Ok(Json(NewsletterResponse { newsletter }))
}

#[utoipa::path(
    delete,
    path = "/admin/newsletters/{newsletter_id}",
    tag = "Newsletters",
    security(("sessionToken" = [])),
    params(("newsletter_id" = String, Path, description = "Newsletter public identifier")),
    responses(
        (status = 200, description = "Newsletter deleted", body = SuccessResponse),
        (status = 404, description = "Newsletter not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_newsletter(
    State(state): State<AppState>,
    Path(newsletter_id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    newsletter_service::delete_newsletter(state.db_pool(), &newsletter_id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

#[utoipa::path(
    get,
    path = "/portal/newsletters",
    tag = "Portal",
    responses((status = 200, description = "Published newsletters, newest first", body = NewslettersResponse))
)]
pub async fn published_newsletters(
    State(state): State<AppState>,
) -> Result<Json<NewslettersResponse>, ApiError> {
    let newsletters = newsletter_service::published_newsletters(state.db_pool()).await?;
    Ok(Json(NewslettersResponse { newsletters }))
}
