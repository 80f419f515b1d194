use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rijschool_backend_runtime::{
    self,
    seed::{create_user, seed_defaults, SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD},
    BackendServices,
};
use rijschool_config::AppConfig;
use rijschool_domain::Role;
use rijschool_notifications::Delivery;
use sqlx::Row;
use tempfile::TempDir;
use tokio::time::{sleep, timeout};

fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}", path.to_string_lossy())
}

fn build_config(temp_dir: &TempDir, database_url: String, max_connections: u32) -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = database_url;
    config.database.max_connections = max_connections;
    config.storage.uploads_dir = temp_dir.path().join("uploads").to_string_lossy().into_owned();
    config
}

async fn initialise(config: &AppConfig) -> Result<BackendServices> {
    BackendServices::initialise(config)
        .await
        .context("failed to initialise backend services")
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_runs_migrations_and_prepares_uploads() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("runtime/init.db");
    let config = build_config(&temp_dir, sqlite_url(&db_path), 4);

    let services = initialise(&config).await?;
    let table: String = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'lesson_bookings'",
    )
    .fetch_one(&services.db_pool)
    .await?;

    assert_eq!("lesson_bookings", table);
    assert!(services.uploads_dir.is_dir());

    drop(services);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unconfigured_sms_gateway_skips_notices() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("runtime/sms.db");
    let config = build_config(&temp_dir, sqlite_url(&db_path), 1);

    let services = initialise(&config).await?;
    let notice = rijschool_notifications::CancellationNotice {
        recipient: "+597 8123456".to_string(),
        lesson_date: NaiveDate::from_ymd_opt(2030, 1, 7).unwrap(),
        instructor_name: "Instructor".to_string(),
    };
    let delivery = services.notifier.send_cancellation(&notice).await?;
    assert_eq!(Delivery::Skipped, delivery);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_wires_static_and_store_logins() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("runtime/auth.db");
    let config = build_config(&temp_dir, sqlite_url(&db_path), 2);

    let services = initialise(&config).await?;

    let (session, _) = services.authenticator.login("admin", "pawiro").await?;
    assert_eq!(Role::Admin, session.role);

    seed_defaults(&services.db_pool).await?;
    let (session, token) = services
        .authenticator
        .login(SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD)
        .await?;
    assert_eq!(Role::Admin, session.role);
    assert_eq!(session, services.authenticator.decode(&token.token)?);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn seeding_twice_keeps_a_single_admin_and_instructor() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("runtime/seed.db");
    let config = build_config(&temp_dir, sqlite_url(&db_path), 2);
    let services = initialise(&config).await?;

    let first = seed_defaults(&services.db_pool).await?;
    assert!(first.admin_created);
    assert_eq!(250_000, first.default_price_cents);
    assert_eq!("Default Instructor", first.instructor);

    let second = seed_defaults(&services.db_pool).await?;
    assert!(!second.admin_created);

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&services.db_pool)
        .await?;
    let instructors: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM instructors")
        .fetch_one(&services.db_pool)
        .await?;
    assert_eq!((1, 1), (users, instructors));

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn create_user_rejects_duplicates_and_blank_input() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("runtime/users.db");
    let config = build_config(&temp_dir, sqlite_url(&db_path), 2);
    let services = initialise(&config).await?;

    let user = create_user(
        &services.db_pool,
        "Office@Example.com",
        "Office",
        "secret",
        Role::Instructor,
    )
    .await?;
    assert_eq!("office@example.com", user.email);
    assert_eq!(Role::Instructor, user.role);

    assert!(create_user(&services.db_pool, "office@example.com", "Again", "x", Role::Admin)
        .await
        .is_err());
    assert!(create_user(&services.db_pool, " ", "Nobody", "x", Role::Admin)
        .await
        .is_err());

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn prepare_database_creates_sqlite_directory_if_missing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_dir = temp_dir.path().join("nested");
    let db_path = db_dir.join("prepared.db");
    let config = build_config(&temp_dir, sqlite_url(&db_path), 2);

    assert!(!db_dir.exists());

    let services = initialise(&config).await?;
    assert!(db_dir.exists(), "database directory should be created");
    assert!(db_path.exists(), "sqlite database file should be created");
    drop(services);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn prepare_database_enables_sqlite_foreign_keys() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("runtime/foreign_keys.db");
    let config = build_config(&temp_dir, sqlite_url(&db_path), 2);

    let services = initialise(&config).await?;

    let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(&services.db_pool)
        .await?;
    assert_eq!(1, enabled, "foreign key enforcement must be enabled");

    drop(services);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn prepare_database_applies_max_connections_setting() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("runtime/max_conn.db");
    let max_connections = 3;
    let config = build_config(&temp_dir, sqlite_url(&db_path), max_connections);

    let services = initialise(&config).await?;
    assert_eq!(
        max_connections,
        services.db_pool.options().get_max_connections()
    );

    drop(services);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn ensure_sqlite_path_noops_for_memory_database() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = build_config(&temp_dir, "sqlite://:memory:".into(), 1);
    let services = initialise(&config).await?;

    let databases = sqlx::query("PRAGMA database_list")
        .fetch_all(&services.db_pool)
        .await?;
    let main_db = databases
        .into_iter()
        .find(|row| {
            row.try_get::<String, _>("name")
                .map(|name| name == "main")
                .unwrap_or(false)
        })
        .context("expected main in PRAGMA database_list")?;
    let file: String = main_db.try_get("file")?;
    assert!(
        file.is_empty(),
        "in-memory sqlite database should not create filesystem entries"
    );

    drop(services);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn ensure_sqlite_path_ignores_non_sqlite_urls() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let target_dir = temp_dir.path().join("should_not_exist");
    let malformed_url = format!("postgres://{}/ignored.db", target_dir.to_string_lossy());
    let config = build_config(&temp_dir, malformed_url, 1);

    assert!(!target_dir.exists());

    let error = match BackendServices::initialise(&config).await {
        Ok(_) => panic!("expected sqlite connection to fail for non-sqlite URL"),
        Err(error) => error,
    };
    assert!(
        !target_dir.exists(),
        "non-sqlite URLs must not create filesystem structures"
    );
    assert!(
        format!("{error:#}").contains("Database connection error"),
        "expected database connection failure for non-sqlite URL, got {error:#}"
    );

    Ok(())
}

#[test]
fn telemetry_init_tracing_sets_global_subscriber() {
    rijschool_backend_runtime::telemetry::init_tracing()
        .expect("first initialisation should succeed");

    let second = rijschool_backend_runtime::telemetry::init_tracing();
    assert!(
        second.is_err(),
        "initialising telemetry twice should fail with global subscriber already set"
    );
}

#[tokio::test(flavor = "multi_thread")]
#[cfg_attr(not(unix), ignore = "requires Unix signal handling")]
async fn shutdown_signal_completes_on_ctrl_c_notification() -> Result<()> {
    let shutdown_task =
        tokio::spawn(async { rijschool_backend_runtime::shutdown_signal().await });

    sleep(Duration::from_millis(50)).await;
    #[cfg(unix)]
    unsafe {
        libc::raise(libc::SIGINT);
    }

    timeout(Duration::from_secs(2), shutdown_task).await??;
    Ok(())
}
