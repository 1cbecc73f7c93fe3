use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body of the push notification form.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewPushNotification {
    pub experience_id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub company_team_id: Option<String>,
    pub subtitle: Option<String>,
    pub link: Option<String>,
    pub rest_path: Option<String>,
    pub user_ids: Option<Vec<String>>,
}

/// A validated notification as handed to the dispatcher.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PushNotification {
    pub experience_id: String,
    pub title: String,
    pub content: String,
    pub sender_user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_path: Option<String>,
    /// Restricts delivery to these users, everyone in the experience otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_ids: Option<Vec<String>>,
}

#[derive(Serialize, Debug, Clone)]
pub struct PushNotificationResponse {
    pub success: bool,
    pub result: Value,
}
