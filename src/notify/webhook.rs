//! Webhook-backed notification delivery.

use std::future::Future;
use std::pin::Pin;

use crate::config::NotifyConfig;
use crate::{AppError, Result};

use super::{Notification, Notifier};

/// Notifier posting JSON payloads to a configured HTTP endpoint.
///
/// The endpoint is expected to fan the payload out to the recipient's
/// registered devices; this crate only hands it over.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl WebhookNotifier {
    /// Build a notifier from the notification config section.
    #[must_use]
    pub fn new(config: &NotifyConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.webhook_url.clone(),
            token: config.webhook_token.clone(),
        }
    }
}

impl Notifier for WebhookNotifier {
    fn notify(
        &self,
        notification: Notification,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let mut request = self.client.post(&self.url).json(&notification);
            if !self.token.is_empty() {
                request = request.bearer_auth(&self.token);
            }

            let response = request
                .send()
                .await
                .map_err(|err| AppError::Notify(format!("webhook request failed: {err}")))?;

            if !response.status().is_success() {
                return Err(AppError::Notify(format!(
                    "webhook returned status {}",
                    response.status()
                )));
            }

            Ok(())
        })
    }
}
