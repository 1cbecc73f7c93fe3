use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use crate::auth::{IdentityVerifier, JwtVerifier};
use crate::core::{DispatcherKind, TrackerConfig};
use crate::errors::AppError;
use crate::notifications::{LogNotificationDispatcher, NotificationDispatcher};
use crate::upstream::{AccessChecker, ExperienceSource, MessageSource, UpstreamClient};

#[derive(Clone)]
pub struct AppState {
    pub env: TrackerConfig,
    pub message_source: Arc<dyn MessageSource>,
    pub experience_source: Arc<dyn ExperienceSource>,
    pub access_checker: Arc<dyn AccessChecker>,
    pub identity_verifier: Arc<dyn IdentityVerifier>,
    pub notification_dispatcher: Arc<dyn NotificationDispatcher>,
    /// Cancelled when the server shuts down; running fetch sessions stop at the next page.
    pub shutdown: CancellationToken,
}

impl AppState {

    pub fn init(config: TrackerConfig) -> Result<Self, AppError> {
        let client = Arc::new(UpstreamClient::new(&config.upstream)?);
        let verifier = Arc::new(JwtVerifier::new(&config.auth)?);

        let notification_dispatcher: Arc<dyn NotificationDispatcher> = match config.notifications.dispatcher {
            DispatcherKind::Upstream => {
                info!("Push notifications are sent to the upstream api.");
                client.clone()
            }
            DispatcherKind::Log => {
                info!("Push notifications are only logged.");
                Arc::new(LogNotificationDispatcher::new())
            }
        };

        Ok(AppState {
            env: config,
            message_source: client.clone(),
            experience_source: client.clone(),
            access_checker: client,
            identity_verifier: verifier,
            notification_dispatcher,
            shutdown: CancellationToken::new(),
        })
    }
}
