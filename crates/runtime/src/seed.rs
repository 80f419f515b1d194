//! First-run data: a login for the office, the default price and an instructor.

use anyhow::{Context, Result};
use rijschool_auth::hash_password;
use rijschool_database::{
    CreateUserRequest, InstructorRepository, SettingsRepository, User, UserRepository,
};
use rijschool_domain::Role;
use sqlx::SqlitePool;
use tracing::info;

pub const SEED_ADMIN_EMAIL: &str = "admin@example.com";
pub const SEED_ADMIN_PASSWORD: &str = "password";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub default_price_cents: i64,
    pub instructor: String,
}

/// Fills an empty database with defaults. Safe to run more than once.
pub async fn seed_defaults(pool: &SqlitePool) -> Result<SeedReport> {
    let users = UserRepository::new(pool.clone());
    let admin_created = if users
        .find_by_email(SEED_ADMIN_EMAIL)
        .await
        .context("failed to look up seed admin")?
        .is_none()
    {
        create_user(pool, SEED_ADMIN_EMAIL, "Administrator", SEED_ADMIN_PASSWORD, Role::Admin)
            .await?;
        true
    } else {
        false
    };

    let settings = SettingsRepository::new(pool.clone())
        .get_or_create()
        .await
        .context("failed to create settings")?;

    let instructor = InstructorRepository::new(pool.clone())
        .first_active_or_default()
        .await
        .context("failed to create default instructor")?;

    info!(
        admin_created,
        default_price_cents = settings.default_price_cents,
        instructor = %instructor.name,
        "seeded database"
    );

    Ok(SeedReport {
        admin_created,
        default_price_cents: settings.default_price_cents,
        instructor: instructor.name,
    })
}

/// Adds a back-office login to the user store.
pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    display_name: &str,
    password: &str,
    role: Role,
) -> Result<User> {
    if email.trim().is_empty() || password.is_empty() {
        anyhow::bail!("email and password are required");
    }

    let password_hash = hash_password(password).context("failed to hash password")?;
    let user = UserRepository::new(pool.clone())
        .create(&CreateUserRequest {
            email: email.to_string(),
            display_name: display_name.to_string(),
            password_hash,
            role,
        })
        .await
        .with_context(|| format!("failed to create user {email}"))?;
    Ok(user)
}
