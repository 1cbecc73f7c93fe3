mod config;
mod app_state;

pub use config::{TrackerConfig, UpstreamConfig, PaginationConfig, EarlyStop, AuthConfig, NotificationConfig, DispatcherKind};
pub use app_state::*;
