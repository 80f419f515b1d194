use chrono::{DateTime, Utc};
use rijschool_domain::Role;
use serde::{Deserialize, Serialize};

/// A staff account stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub public_id: String,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// `password_hash` must already be hashed; this crate never sees plain passwords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: Role,
}
