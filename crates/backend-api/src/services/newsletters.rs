use rijschool_database::{CreateNewsletterRequest, Newsletter, NewsletterRepository};
use sqlx::SqlitePool;

use super::error::ServiceError;
use crate::routes::models::NewsletterBody;

pub async fn create_newsletter(
    pool: &SqlitePool,
    body: NewsletterBody,
) -> Result<Newsletter, ServiceError> {
    if body.title.trim().is_empty() || body.content.trim().is_empty() {
        return Err(ServiceError::bad_request("Title and content are required"));
    }

    Ok(NewsletterRepository::new(pool.clone())
        .create(&CreateNewsletterRequest {
            title: body.title,
            content: body.content,
            category: body.category.unwrap_or_default(),
            publish: body.publish,
        })
        .await?)
}

pub async fn list_newsletters(pool: &SqlitePool) -> Result<Vec<Newsletter>, ServiceError> {
    Ok(NewsletterRepository::new(pool.clone()).list().await?)
}

pub async fn published_newsletters(pool: &SqlitePool) -> Result<Vec<Newsletter>, ServiceError> {
    Ok(NewsletterRepository::new(pool.clone()).list_published().await?)
}

pub async fn set_published(
    pool: &SqlitePool,
    public_id: &str,
    published: bool,
) -> Result<Newsletter, ServiceError> {
    Ok(NewsletterRepository::new(pool.clone())
        .set_published(public_id, published)
        .await?)
}

pub async fn delete_newsletter(pool: &SqlitePool, public_id: &str) -> Result<(), ServiceError> {
    Ok(NewsletterRepository::new(pool.clone()).delete(public_id).await?)
}
