use std::collections::BTreeSet;
use serde::Serialize;
use serde_json::Value;
use crate::messages::pagination::StopReason;
use crate::messages::timestamp::{calendar_date, to_iso};
use crate::messages::DateWindow;
use crate::upstream::UpstreamError;

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    /// Epoch milliseconds (UTC); `None` when the upstream value did not parse.
    pub created_at: Option<i64>,
    pub content: Option<String>,
    pub author: Option<Value>,
    pub is_edited: bool,
    pub is_pinned: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct RequestedDateRange {
    pub start: String,
    pub end: String,
}

impl From<&DateWindow> for RequestedDateRange {
    fn from(window: &DateWindow) -> Self {
        RequestedDateRange {
            start: window.start_iso(),
            end: window.end_iso(),
        }
    }
}

/// What the fetched messages actually span, for discovering usable dates.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObservedDateRange {
    pub oldest: String,
    pub newest: String,
    /// Distinct UTC calendar dates, ascending.
    pub distinct_dates: Vec<String>,
    /// Messages that carried a usable timestamp.
    pub timestamped_count: usize,
}

impl ObservedDateRange {
    pub fn from_messages(messages: &[Message]) -> Option<Self> {
        let timestamps: Vec<i64> = messages.iter().filter_map(|msg| msg.created_at).collect();
        let oldest = *timestamps.iter().min()?;
        let newest = *timestamps.iter().max()?;
        let distinct_dates: BTreeSet<String> = timestamps.iter().filter_map(|ts| calendar_date(*ts)).collect();

        Some(ObservedDateRange {
            oldest: to_iso(oldest)?,
            newest: to_iso(newest)?,
            distinct_dates: distinct_dates.into_iter().collect(),
            timestamped_count: timestamps.len(),
        })
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct UpstreamFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub detail: String,
}

impl From<&UpstreamError> for UpstreamFailure {
    fn from(err: &UpstreamError) -> Self {
        UpstreamFailure {
            status: err.status(),
            detail: err.to_string(),
        }
    }
}

/// Result of one listing request: the filtered messages plus how they were obtained.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MessageListing {
    pub items: Vec<Message>,
    pub total_count: usize,
    pub pages_processed: u32,
    /// The page ceiling was reached, older messages may be missing.
    pub truncated: bool,
    /// Any reason the listing may be short: ceiling, upstream failure or cancellation.
    pub incomplete: bool,
    pub stop_reason: StopReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_error: Option<UpstreamFailure>,
    /// Upstream records that were skipped as undecodable.
    pub dropped_records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<RequestedDateRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_date_range: Option<ObservedDateRange>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MessagesResponse {
    pub experience_id: String,
    #[serde(flatten)]
    pub listing: MessageListing,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChatActivityResponse {
    pub chat_experience_id: String,
    pub date: String,
    pub total_messages: usize,
    pub messages: Vec<Message>,
    pub date_range: RequestedDateRange,
    pub pages_processed: u32,
    pub truncated: bool,
    pub incomplete: bool,
    pub stop_reason: StopReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_error: Option<UpstreamFailure>,
    pub dropped_records: usize,
}

/// Number of sample dates returned by the discovery endpoint.
pub const AVAILABLE_DATES_LIMIT: usize = 20;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SampledDateRange {
    pub oldest: String,
    pub newest: String,
    pub total_messages: usize,
    pub pages_sampled: u32,
    pub available_dates: Vec<String>,
    pub total_unique_dates: usize,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MessageDatesResponse {
    pub experience_id: String,
    pub date_range: Option<SampledDateRange>,
    pub message: String,
    pub incomplete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_error: Option<UpstreamFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str, created_at: Option<i64>) -> Message {
        Message { id: id.to_string(), created_at, content: None, author: None, is_edited: false, is_pinned: false }
    }

    #[test]
    fn observed_range_spans_all_timestamped_messages() {
        let messages = vec![
            message("a", Some(1_710_460_800_000)), // 2024-03-15
            message("b", None),
            message("c", Some(1_710_374_400_000)), // 2024-03-14
            message("d", Some(1_710_460_900_000)),
        ];
        let range = ObservedDateRange::from_messages(&messages).unwrap();
        assert_eq!(range.oldest, "2024-03-14T00:00:00.000Z");
        assert_eq!(range.newest, "2024-03-15T00:01:40.000Z");
        assert_eq!(range.distinct_dates, vec!["2024-03-14", "2024-03-15"]);
        assert_eq!(range.timestamped_count, 3);
    }

    #[test]
    fn no_timestamps_means_no_observed_range() {
        assert!(ObservedDateRange::from_messages(&[message("a", None)]).is_none());
        assert!(ObservedDateRange::from_messages(&[]).is_none());
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(message("a", Some(5))).unwrap();
        assert_eq!(json["createdAt"], 5);
        assert_eq!(json["isPinned"], false);
    }
}
