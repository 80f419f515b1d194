use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use rijschool_auth::Authenticator;
use rijschool_config::AppConfig;
use rijschool_database::initialize_database;
use rijschool_notifications::{gateway_from_config, NotificationGateway};
use sqlx::SqlitePool;
use tracing::{info, warn};

pub mod seed;

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::INFO)
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
    pub authenticator: Authenticator,
    pub notifier: Arc<dyn NotificationGateway>,
    pub uploads_dir: PathBuf,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let db_pool = initialize_database(&config.database).await?;

        let authenticator = Authenticator::new(db_pool.clone(), &config.auth)
            .context("failed to configure authentication")?;

        let notifier = gateway_from_config(&config.notifications.sms)
            .context("failed to configure sms gateway")?;
        if config.notifications.sms.is_configured() {
            info!(base_url = %config.notifications.sms.base_url, "sms gateway ready");
        } else {
            warn!("sms gateway not configured, cancellation texts will be skipped");
        }

        let uploads_dir = PathBuf::from(&config.storage.uploads_dir);
        tokio::fs::create_dir_all(&uploads_dir)
            .await
            .with_context(|| format!("failed to create uploads directory {}", uploads_dir.display()))?;

        Ok(Self {
            db_pool,
            authenticator,
            notifier,
            uploads_dir,
        })
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
