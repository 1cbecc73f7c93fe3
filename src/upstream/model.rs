//! Wire shapes of the upstream api. Everything here is lenient on purpose:
//! absent collections decode as empty, absent pagination as "no more data".

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Deserialize, Debug, Default)]
pub struct MessagesResponse {
    #[serde(default)]
    pub data: Option<Vec<Value>>,
    #[serde(default)]
    pub page_info: Option<PageInfo>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct PageInfo {
    #[serde(default, alias = "hasNextPage", deserialize_with = "lenient_flag")]
    pub has_next_page: bool,
    #[serde(default, alias = "endCursor")]
    pub end_cursor: Option<String>,
}

/// One message record. `createdAt` is the only timestamp field read.
///
/// Only a missing or unusable `id` rejects a record; every other field falls back
/// to its empty value when it is `null` or of an unexpected type.
#[derive(Deserialize, Debug, Clone)]
pub struct RawMessage {
    #[serde(deserialize_with = "message_id")]
    pub id: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<Value>,
    #[serde(rename = "isEdited", default, deserialize_with = "lenient_flag")]
    pub is_edited: bool,
    #[serde(rename = "isPinned", default, deserialize_with = "lenient_flag")]
    pub is_pinned: bool,
}

fn message_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(id) if !id.trim().is_empty() => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(D::Error::custom(format!("unusable message id: {}", other))),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        _ => Ok(None),
    }
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

#[derive(Deserialize, Debug, Default)]
pub struct ExperiencesResponse {
    #[serde(default)]
    pub data: Option<Vec<Experience>>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Experience {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo: Option<ExperienceLogo>,
    #[serde(default)]
    pub app: Option<ExperienceApp>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ExperienceLogo {
    #[serde(default, alias = "sourceUrl")]
    pub source_url: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ExperienceApp {
    pub id: String,
}
