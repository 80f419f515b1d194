use std::path::{Path, PathBuf};
use std::sync::Arc;

use rijschool_auth::{AuthError, Authenticator, SessionContext};
use rijschool_notifications::NotificationGateway;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    db_pool: SqlitePool,
    authenticator: Authenticator,
    notifier: Arc<dyn NotificationGateway>,
    uploads_dir: PathBuf,
}

impl AppState {
    pub fn new(
        db_pool: SqlitePool,
        authenticator: Authenticator,
        notifier: Arc<dyn NotificationGateway>,
        uploads_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            db_pool,
            authenticator,
            notifier,
            uploads_dir: uploads_dir.into(),
        }
    }

    pub fn db_pool(&self) -> &SqlitePool {
        &self.db_pool
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn notifier(&self) -> &dyn NotificationGateway {
        self.notifier.as_ref()
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn authenticate(&self, token: &str) -> Result<SessionContext, AuthError> {
        self.authenticator.decode(token)
    }
}
