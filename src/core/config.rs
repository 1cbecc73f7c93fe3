use std::time::Duration;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct TrackerConfig {
    pub server_url: String,
    pub server_port: u16,
    pub log_level: String,
    pub cors_origin: String,
    /// Upstream app id that marks an experience as a chat channel.
    pub chat_app_id: String,
    pub upstream: UpstreamConfig,
    pub pagination: PaginationConfig,
    pub auth: AuthConfig,
    pub notifications: NotificationConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UpstreamConfig {
    pub api_url: String,
    pub api_key: String,
    pub page_size: u32,
    pub request_timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PaginationConfig {
    pub max_pages: u32,
    pub discovery_max_pages: u32,
    pub inter_page_delay_ms: u64,
    pub early_stop: EarlyStop,
    pub session_timeout_secs: u64,
}

impl PaginationConfig {
    pub fn inter_page_delay(&self) -> Duration {
        Duration::from_millis(self.inter_page_delay_ms)
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }
}

/// When the driver may stop paging because a whole page predates the window.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EarlyStop {
    /// Only while every page seen so far is newest-first.
    ///
    /// The first page can only be checked against itself: an oldest-first upstream whose
    /// first page holds a single timestamped message older than the window still stops
    /// the session there. Use `off` for upstreams without a newest-first guarantee.
    #[default]
    Verified,
    /// Trust the upstream to deliver newest-first pages.
    AssumeOrdered,
    Off,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AuthConfig {
    pub token_header: String,
    /// One of the `jsonwebtoken` algorithm names, e.g. `ES256` or `HS256`.
    pub algorithm: String,
    /// PEM public key for asymmetric algorithms, the shared secret for HMAC.
    pub key: String,
    pub issuer: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NotificationConfig {
    pub dispatcher: DispatcherKind,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DispatcherKind {
    Upstream,
    Log,
}

//examples: https://github.com/rust-cli/config-rs/blob/main/examples/hierarchical-env/settings.rs
impl TrackerConfig {
    pub fn new_config(mode: &str) -> Result<Self, ConfigError> {
        //layering the different sources, default values first, overwritten by the mode file and env-vars
        let config = Config::builder()
            .add_source(File::with_name("default.config.toml"))
            .add_source(File::with_name(&format!("{mode}.config.toml")).required(false))
            .add_source(Environment::default().separator("__"))
            .build()?;
        config.try_deserialize()
    }
}
