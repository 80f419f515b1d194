//! Staff accounts used by the store-backed credential check.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::entities::{CreateUserRequest, User};
use crate::ids::new_public_id;
use crate::types::DatabaseResult;

const USER_COLUMNS: &str = "id, public_id, email, display_name, password_hash, role, created_at";

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &CreateUserRequest) -> DatabaseResult<User> {
        let sql = format!(
            "INSERT INTO users (public_id, email, display_name, password_hash, role, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(new_public_id())
            .bind(request.email.trim().to_lowercase())
            .bind(&request.display_name)
            .bind(&request.password_hash)
            .bind(request.role.as_str())
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        info!(user_id = user.id, email = %user.email, role = %user.role, "created user");
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn count(&self) -> DatabaseResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
