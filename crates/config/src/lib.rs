use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "rijschool.toml",
    "config/rijschool.toml",
    "crates/config/rijschool.toml",
    "../rijschool.toml",
    "../config/rijschool.toml",
];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 7070,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://rijschool.db".to_string(),
            max_connections: 10,
        }
    }
}

/// A username/password pair that is accepted without consulting the user store.
///
/// `role` holds the wire name of the granted role (`ADMIN` or `INSTRUCTOR`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaticCredential {
    pub username: String,
    pub password: String,
    pub role: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "AuthConfig::default_token_secret")]
    pub token_secret: String,
    #[serde(default = "AuthConfig::default_token_issuer")]
    pub token_issuer: String,
    #[serde(default = "AuthConfig::default_session_ttl")]
    pub session_ttl_seconds: u64,
    #[serde(default = "AuthConfig::default_static_credentials")]
    pub static_credentials: Vec<StaticCredential>,
}

impl AuthConfig {
    fn default_token_secret() -> String {
        "change-me-in-production".to_string()
    }

    fn default_token_issuer() -> String {
        "rijschool".to_string()
    }

    fn default_session_ttl() -> u64 {
        86_400
    }

    fn default_static_credentials() -> Vec<StaticCredential> {
        vec![
            StaticCredential {
                username: "admin".to_string(),
                password: "pawiro".to_string(),
                role: "ADMIN".to_string(),
                display_name: Some("Administrator".to_string()),
            },
            StaticCredential {
                username: "instructor".to_string(),
                password: "pawiro".to_string(),
                role: "INSTRUCTOR".to_string(),
                display_name: Some("Instructor".to_string()),
            },
        ]
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: Self::default_token_secret(),
            token_issuer: Self::default_token_issuer(),
            session_ttl_seconds: Self::default_session_ttl(),
            static_credentials: Self::default_static_credentials(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotificationsConfig {
    #[serde(default)]
    pub sms: SmsGatewayConfig,
}

/// Settings for the SMS relay used to tell students about cancelled lessons.
///
/// ```
/// use rijschool_config::SmsGatewayConfig;
///
/// let sms = SmsGatewayConfig::default();
/// assert_eq!(sms.base_url, "https://api.textbee.dev/api/v1");
/// assert_eq!(sms.request_timeout_seconds, 10);
/// assert!(!sms.is_configured());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsGatewayConfig {
    #[serde(default = "SmsGatewayConfig::default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default = "SmsGatewayConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl SmsGatewayConfig {
    fn default_base_url() -> String {
        "https://api.textbee.dev/api/v1".to_string()
    }

    const fn default_request_timeout() -> u64 {
        10
    }

    /// True when both the API key and the device id are present and non-empty.
    pub fn is_configured(&self) -> bool {
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .map(|v| !v.trim().is_empty())
                .unwrap_or(false)
        };
        present(&self.api_key) && present(&self.device_id)
    }
}

impl Default for SmsGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            api_key: None,
            device_id: None,
            request_timeout_seconds: Self::default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub uploads_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: "uploads".to_string(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use rijschool_config::load;
///
/// std::env::remove_var("RIJSCHOOL_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let db_max = i64::from(defaults.database.max_connections);
    let session_ttl_i64 = i64::try_from(defaults.auth.session_ttl_seconds).unwrap_or(i64::MAX);
    let sms_timeout =
        i64::try_from(defaults.notifications.sms.request_timeout_seconds).unwrap_or(i64::MAX);

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default("database.max_connections", db_max)?
        .set_default("auth.token_secret", defaults.auth.token_secret.clone())?
        .set_default("auth.token_issuer", defaults.auth.token_issuer.clone())?
        .set_default("auth.session_ttl_seconds", session_ttl_i64)?
        .set_default(
            "notifications.sms.base_url",
            defaults.notifications.sms.base_url.clone(),
        )?
        .set_default("notifications.sms.request_timeout_seconds", sms_timeout)?
        .set_default("storage.uploads_dir", defaults.storage.uploads_dir.clone())?;

    let environment_overrides = config::Environment::with_prefix("RIJSCHOOL").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("RIJSCHOOL_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via RIJSCHOOL_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if config.auth.session_ttl_seconds > i64::MAX as u64 {
        config.auth.session_ttl_seconds = i64::MAX as u64;
    }

    debug!(
        http.address = %config.http.address,
        http.port = config.http.port,
        database.url = %config.database.url,
        sms.configured = config.notifications.sms.is_configured(),
        "loaded backend configuration"
    );
    Ok(config)
}
