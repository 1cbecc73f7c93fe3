#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use chat_activity_tracker::auth::{CallerIdentity, IdentityVerifier};
use chat_activity_tracker::core::{
    AppState, AuthConfig, DispatcherKind, EarlyStop, NotificationConfig, PaginationConfig, TrackerConfig, UpstreamConfig,
};
use chat_activity_tracker::errors::AppError;
use chat_activity_tracker::init_router;
use chat_activity_tracker::messages::Message;
use chat_activity_tracker::notifications::{NotificationDispatcher, PushNotification};
use chat_activity_tracker::upstream::model::Experience;
use chat_activity_tracker::upstream::{
    AccessChecker, AccessDecision, AccessLevel, ExperienceSource, MessagePage, MessageSource, UpstreamError,
};

pub const ADMIN_TOKEN: &str = "admin-token";
pub const CUSTOMER_TOKEN: &str = "customer-token";
pub const CHAT_APP_ID: &str = "app_chat";

/// 2024-03-15T00:00:00.000Z
pub const MARCH_15: i64 = 1_710_460_800_000;

pub fn test_config() -> TrackerConfig {
    TrackerConfig {
        server_url: "127.0.0.1".to_string(),
        server_port: 0,
        log_level: "debug".to_string(),
        cors_origin: "http://localhost:3000".to_string(),
        chat_app_id: CHAT_APP_ID.to_string(),
        upstream: UpstreamConfig {
            api_url: "http://upstream.invalid/v1".to_string(),
            api_key: String::new(),
            page_size: 100,
            request_timeout_secs: 5,
        },
        pagination: PaginationConfig {
            max_pages: 50,
            discovery_max_pages: 10,
            inter_page_delay_ms: 0,
            early_stop: EarlyStop::Verified,
            session_timeout_secs: 30,
        },
        auth: AuthConfig {
            token_header: "x-whop-user-token".to_string(),
            algorithm: "HS256".to_string(),
            key: "unused".to_string(),
            issuer: None,
        },
        notifications: NotificationConfig {
            dispatcher: DispatcherKind::Log,
        },
    }
}

pub fn message(id: &str, created_at: Option<i64>) -> Message {
    Message {
        id: id.to_string(),
        created_at,
        content: Some(format!("content of {id}")),
        author: Some(json!({"id": "user_author"})),
        is_edited: false,
        is_pinned: false,
    }
}

/// Serves `pages[n]` for the cursor `n`, the first page without a cursor.
#[derive(Default)]
pub struct FakeMessages {
    pages: Vec<Vec<Message>>,
    /// Page index from which on every fetch fails, and the status it fails with.
    fail_from: Option<(usize, u16)>,
    pub calls: AtomicUsize,
}

impl FakeMessages {
    pub fn with_pages(pages: Vec<Vec<Message>>) -> Self {
        FakeMessages { pages, ..Default::default() }
    }

    pub fn failing(status: u16) -> Self {
        FakeMessages { fail_from: Some((0, status)), ..Default::default() }
    }

    pub fn failing_at(pages: Vec<Vec<Message>>, index: usize, status: u16) -> Self {
        FakeMessages { pages, fail_from: Some((index, status)), ..Default::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageSource for FakeMessages {
    async fn fetch_page(&self, _channel_id: &str, cursor: Option<&str>) -> Result<MessagePage, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let index: usize = cursor.map_or(0, |c| c.parse().unwrap());
        if let Some((from, status)) = self.fail_from {
            if index >= from {
                return Err(UpstreamError::Status { status, body: "upstream down".to_string() });
            }
        }
        let items = self.pages.get(index).cloned().unwrap_or_default();
        let has_next_page = index + 1 < self.pages.len();
        Ok(MessagePage {
            items,
            end_cursor: has_next_page.then(|| (index + 1).to_string()),
            has_next_page,
            dropped: 0,
        })
    }
}

pub struct FakeExperiences {
    experiences: Value,
}

#[async_trait]
impl ExperienceSource for FakeExperiences {
    async fn list_experiences(&self, _company_id: &str) -> Result<Vec<Experience>, UpstreamError> {
        Ok(serde_json::from_value(self.experiences.clone())?)
    }
}

/// `user_admin` moderates every company, everybody else is a customer.
pub struct FakeAccess;

#[async_trait]
impl AccessChecker for FakeAccess {
    async fn check_company_access(&self, user_id: &str, _company_id: &str) -> Result<AccessDecision, UpstreamError> {
        let access_level = if user_id == "user_admin" { AccessLevel::Admin } else { AccessLevel::Customer };
        Ok(AccessDecision { has_access: true, access_level })
    }
}

pub struct FakeVerifier;

#[async_trait]
impl IdentityVerifier for FakeVerifier {
    async fn verify(&self, token: &str) -> Result<CallerIdentity, AppError> {
        let user_id = match token {
            ADMIN_TOKEN => "user_admin",
            CUSTOMER_TOKEN => "user_customer",
            _ => return Err(AppError::Unauthorized("invalid token".to_string())),
        };
        Ok(CallerIdentity { user_id: user_id.to_string() })
    }
}

#[derive(Default)]
pub struct RecordingDispatcher {
    pub sent: Mutex<Vec<PushNotification>>,
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send_push_notification(&self, notification: &PushNotification) -> Result<Value, UpstreamError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(json!({"id": "ntf_1"}))
    }
}

pub struct TestApp {
    pub router: Router,
    pub messages: Arc<FakeMessages>,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub shutdown: CancellationToken,
}

impl TestApp {
    pub fn new(messages: FakeMessages) -> Self {
        Self::with_config(messages, test_config())
    }

    pub fn with_config(messages: FakeMessages, config: TrackerConfig) -> Self {
        let messages = Arc::new(messages);
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let shutdown = CancellationToken::new();
        let state = AppState {
            env: config,
            message_source: messages.clone(),
            experience_source: Arc::new(FakeExperiences {
                experiences: json!([
                    {"id": "exp_general", "name": "General", "app": {"id": CHAT_APP_ID}},
                    {"id": "exp_course", "name": "Course", "app": {"id": "app_courses"}}
                ]),
            }),
            access_checker: Arc::new(FakeAccess),
            identity_verifier: Arc::new(FakeVerifier),
            notification_dispatcher: dispatcher.clone(),
            shutdown: shutdown.clone(),
        };
        let router = init_router(state).unwrap();
        TestApp { router, messages, dispatcher, shutdown }
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("x-whop-user-token", token);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn pages(entries: &[&[(&str, Option<i64>)]]) -> Vec<Vec<Message>> {
    entries
        .iter()
        .map(|page| page.iter().map(|(id, ts)| message(id, *ts)).collect())
        .collect()
}

