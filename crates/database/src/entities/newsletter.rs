use chrono::{DateTime, Utc};
use rijschool_domain::NewsletterCategory;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Newsletter {
    pub id: i64,
    pub public_id: String,
    pub title: String,
    pub content: String,
    #[sqlx(try_from = "String")]
    pub category: NewsletterCategory,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNewsletterRequest {
    pub title: String,
    pub content: String,
    pub category: NewsletterCategory,
    pub publish: bool,
}
