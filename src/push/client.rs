//! Push notification API client.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::json;

use crate::push::error::PushError;
use crate::push::payload::NotificationPayload;

/// Interface to the external push notification service.
///
/// Failure is independent per call; a failed delivery never affects
/// other deliveries in the same pass.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, payload: &NotificationPayload) -> Result<(), PushError>;
}

/// HTTP client for the push notification API.
pub struct PushClient {
    pub api_url: String,
    user: String,
    password: String,
    dry_run: bool,
    client: Client,
}

impl PushClient {
    pub fn new(api_url: &str, user: &str, password: &str, dry_run: bool) -> Self {
        let client = Client::builder()
            .build()
            .expect("Failed to create client");

        Self {
            api_url: api_url.to_string(),
            user: user.to_string(),
            password: password.to_string(),
            dry_run,
            client,
        }
    }
}

#[async_trait]
impl PushSender for PushClient {
    async fn send(&self, payload: &NotificationPayload) -> Result<(), PushError> {
        debug!(
            "Sending push notification to {} token ({} chars).",
            payload.platform,
            payload.token.len()
        );

        let body = json!({
            "title": payload.title,
            "content": payload.content,
            "token": payload.token,
            "platform": payload.platform,
            "dryRun": self.dry_run,
            "data": payload.data.to_value(),
        });

        let resp = self
            .client
            .post(&self.api_url)
            .basic_auth(&self.user, Some(&self.password))
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(PushError::DeliveryFailed {
                status: resp.status().as_u16(),
            });
        }

        // No response payload is consumed.
        Ok(())
    }
}
