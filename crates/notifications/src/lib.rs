//! Student notifications.
//!
//! The only message the school sends today is the lesson-cancelled SMS.
//! Delivery is best effort: callers log failures and carry on.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rijschool_config::SmsGatewayConfig;
use rijschool_domain::calendar::format_lesson_date;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("sms gateway request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("sms gateway is missing {0}")]
    MissingSetting(&'static str),
}

/// What the student needs to know about a cancelled lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationNotice {
    pub recipient: String,
    pub lesson_date: NaiveDate,
    pub instructor_name: String,
}

impl CancellationNotice {
    pub fn message(&self) -> String {
        format!(
            "Your driving lesson on {} has been cancelled by {}. Please contact the driving school to reschedule.",
            format_lesson_date(self.lesson_date),
            self.instructor_name
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    Sent,
    /// No gateway is configured; nothing was sent.
    Skipped,
}

impl Delivery {
    pub fn was_sent(self) -> bool {
        matches!(self, Delivery::Sent)
    }
}

#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn send_cancellation(
        &self,
        notice: &CancellationNotice,
    ) -> Result<Delivery, NotificationError>;
}

#[derive(Serialize)]
struct SendSmsBody<'a> {
    recipients: [&'a str; 1],
    message: &'a str,
}

/// Sends texts through an SMS relay reached over HTTPS.
pub struct SmsGateway {
    client: Client,
    base_url: String,
    api_key: String,
    device_id: String,
}

impl SmsGateway {
    pub fn from_config(config: &SmsGatewayConfig) -> Result<Self, NotificationError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|value| !value.trim().is_empty())
            .ok_or(NotificationError::MissingSetting("api_key"))?;
        let device_id = config
            .device_id
            .clone()
            .filter(|value| !value.trim().is_empty())
            .ok_or(NotificationError::MissingSetting("device_id"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.max(1)))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            device_id,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/gateway/devices/{}/send-sms",
            self.base_url, self.device_id
        )
    }
}

#[async_trait]
impl NotificationGateway for SmsGateway {
    async fn send_cancellation(
        &self,
        notice: &CancellationNotice,
    ) -> Result<Delivery, NotificationError> {
        let message = notice.message();
        let body = SendSmsBody {
            recipients: [notice.recipient.as_str()],
            message: &message,
        };

        self.client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        info!(
            recipient = %notice.recipient,
            lesson_date = %notice.lesson_date,
            "sent cancellation sms"
        );
        Ok(Delivery::Sent)
    }
}

/// Stand-in used when no SMS relay is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledGateway;

#[async_trait]
impl NotificationGateway for DisabledGateway {
    async fn send_cancellation(
        &self,
        notice: &CancellationNotice,
    ) -> Result<Delivery, NotificationError> {
        warn!(
            recipient = %notice.recipient,
            "sms gateway not configured, cancellation notice not sent"
        );
        Ok(Delivery::Skipped)
    }
}

/// The SMS gateway when credentials are present, otherwise [`DisabledGateway`].
pub fn gateway_from_config(
    config: &SmsGatewayConfig,
) -> Result<Arc<dyn NotificationGateway>, NotificationError> {
    if config.is_configured() {
        Ok(Arc::new(SmsGateway::from_config(config)?))
    } else {
        Ok(Arc::new(DisabledGateway))
    }
}
