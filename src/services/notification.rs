//! Notification dispatcher adapter
//!
//! Turns a committed lifecycle event into one outbound request to the
//! email-sending endpoint. Callers never roll back on a dispatch error.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::config::NotificationConfig;
use crate::models::{NotificationRequest, NotificationResponse};
use crate::utils::{AppError, AppResult};

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Send one notification; `Err` is always `AppError::Notification`
    async fn dispatch(&self, request: &NotificationRequest) -> AppResult<()>;
}

/// POSTs the payload as JSON and expects `{"success": true}` back
pub struct HttpNotificationDispatcher {
    http_client: Client,
    endpoint_url: String,
}

impl HttpNotificationDispatcher {
    pub fn new(endpoint_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build notification HTTP client")?;

        Ok(Self {
            http_client,
            endpoint_url: endpoint_url.into(),
        })
    }
}

#[async_trait]
impl NotificationDispatcher for HttpNotificationDispatcher {
    async fn dispatch(&self, request: &NotificationRequest) -> AppResult<()> {
        debug!(
            action = %request.action,
            appointment_id = %request.appointment.id,
            "Dispatching notification to {}",
            self.endpoint_url
        );

        let response = self
            .http_client
            .post(&self.endpoint_url)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Notification(format!(
                "Notification endpoint returned error {}: {}",
                status.as_u16(),
                body
            )));
        }

        let reply: NotificationResponse = response.json().await.map_err(|e| {
            AppError::Notification(format!("Invalid notification endpoint response: {}", e))
        })?;

        if !reply.success {
            return Err(AppError::Notification(
                "Notification endpoint reported failure".to_string(),
            ));
        }

        Ok(())
    }
}

/// Used when no endpoint is configured: the event is logged and counts as sent
#[derive(Debug, Default, Clone)]
pub struct LoggingNotificationDispatcher;

#[async_trait]
impl NotificationDispatcher for LoggingNotificationDispatcher {
    async fn dispatch(&self, request: &NotificationRequest) -> AppResult<()> {
        info!(
            action = %request.action,
            appointment_id = %request.appointment.id,
            customer_email = %request.customer_email,
            actor = request.actor.as_deref().unwrap_or("-"),
            "Notification endpoint disabled; event logged only"
        );
        Ok(())
    }
}

/// Pick the dispatcher for the configured notification settings
pub fn dispatcher_from_config(
    config: &NotificationConfig,
) -> anyhow::Result<Arc<dyn NotificationDispatcher>> {
    match (config.enabled, config.endpoint_url.as_deref()) {
        (true, Some(url)) => {
            info!("Notifications will be sent to {}", url);
            Ok(Arc::new(HttpNotificationDispatcher::new(
                url,
                Duration::from_secs(config.timeout_secs),
            )?))
        }
        (true, None) => anyhow::bail!("Notifications enabled without an endpoint URL"),
        (false, _) => {
            info!("Notifications disabled; lifecycle events will only be logged");
            Ok(Arc::new(LoggingNotificationDispatcher))
        }
    }
}
