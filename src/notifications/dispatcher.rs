use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;
use crate::notifications::PushNotification;
use crate::upstream::{UpstreamClient, UpstreamError};

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send_push_notification(&self, notification: &PushNotification) -> Result<Value, UpstreamError>;
}

#[async_trait]
impl NotificationDispatcher for UpstreamClient {
    async fn send_push_notification(&self, notification: &PushNotification) -> Result<Value, UpstreamError> {
        let url = self.endpoint("notifications")?;
        self.send_json(self.post(url).json(notification)).await
    }
}

/// Used for local development: nothing leaves the process.
pub struct LogNotificationDispatcher;

impl LogNotificationDispatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogNotificationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationDispatcher for LogNotificationDispatcher {
    async fn send_push_notification(&self, notification: &PushNotification) -> Result<Value, UpstreamError> {
        info!(
            "Push notification '{}' for {} from {} (recipients: {})",
            notification.title,
            notification.experience_id,
            notification.sender_user_id,
            notification.user_ids.as_ref().map_or(0, Vec::len)
        );
        Ok(json!({ "dispatched": false }))
    }
}
