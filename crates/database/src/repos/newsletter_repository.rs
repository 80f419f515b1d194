//! Newsletters shown on the student portal.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::entities::{CreateNewsletterRequest, Newsletter};
use crate::ids::new_public_id;
use crate::types::{DatabaseError, DatabaseResult};

const NEWSLETTER_COLUMNS: &str =
    "id, public_id, title, content, category, is_published, published_at, created_at";

pub struct NewsletterRepository {
    pool: SqlitePool,
}

impl NewsletterRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &CreateNewsletterRequest) -> DatabaseResult<Newsletter> {
        let now = Utc::now();
        let published_at = request.publish.then_some(now);

        let sql = format!(
            "INSERT INTO newsletters (public_id, title, content, category, is_published, \
             published_at, created_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {NEWSLETTER_COLUMNS}"
        );
        let newsletter = sqlx::query_as::<_, Newsletter>(&sql)
            .bind(new_public_id())
            .bind(request.title.trim())
            .bind(request.content.trim())
            .bind(request.category.as_str())
            .bind(request.publish)
            .bind(published_at)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        info!(
            newsletter = %newsletter.public_id,
            published = newsletter.is_published,
            "created newsletter"
        );
        Ok(newsletter)
    }

    /// Every newsletter, newest first.
    pub async fn list(&self) -> DatabaseResult<Vec<Newsletter>> {
        let sql = format!(
            "SELECT {NEWSLETTER_COLUMNS} FROM newsletters ORDER BY created_at DESC, id DESC"
        );
        Ok(sqlx::query_as::<_, Newsletter>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Published newsletters, most recently published first.
    pub async fn list_published(&self) -> DatabaseResult<Vec<Newsletter>> {
        let sql = format!(
            "SELECT {NEWSLETTER_COLUMNS} FROM newsletters WHERE is_published = 1 \
             ORDER BY published_at DESC, id DESC"
        );
        Ok(sqlx::query_as::<_, Newsletter>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Publishing stamps `published_at`; unpublishing clears it.
    pub async fn set_published(&self, public_id: &str, published: bool) -> DatabaseResult<Newsletter> {
        let published_at = published.then(Utc::now);
        let sql = format!(
            "UPDATE newsletters SET is_published = ?, published_at = ? WHERE public_id = ? \
             RETURNING {NEWSLETTER_COLUMNS}"
        );
        let newsletter = sqlx::query_as::<_, Newsletter>(&sql)
            .bind(published)
            .bind(published_at)
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("newsletter {public_id}")))?;

        info!(newsletter = %public_id, published, "changed newsletter visibility");
        Ok(newsletter)
    }

    pub async fn delete(&self, public_id: &str) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM newsletters WHERE public_id = ?")
            .bind(public_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("newsletter {public_id}")));
        }
        info!(newsletter = %public_id, "deleted newsletter");
        Ok(())
    }
}
