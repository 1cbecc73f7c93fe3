use async_trait::async_trait;
use tracing::{debug, warn};
use crate::messages::Message;
use crate::upstream::model::{MessagesResponse, RawMessage};
use crate::upstream::{UpstreamClient, UpstreamError};

/// One normalized page of channel messages, in upstream order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessagePage {
    pub items: Vec<Message>,
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
    /// Records of the page that could not be decoded into a message.
    pub dropped: usize,
}

impl MessagePage {

    /// The cursor to continue with, if the upstream both announces and supplies one.
    pub fn continuation(&self) -> Option<&str> {
        match (self.has_next_page, self.end_cursor.as_deref()) {
            (true, Some(cursor)) if !cursor.is_empty() => Some(cursor),
            _ => None,
        }
    }

    pub fn from_response(response: MessagesResponse) -> Self {
        let page_info = response.page_info.unwrap_or_default();
        let records = response.data.unwrap_or_default();

        if !records.is_empty() && !records.iter().any(|record| record.get("createdAt").is_some()) {
            warn!("No record of the page carries a 'createdAt' field, the upstream message schema may have changed.");
        }

        let record_count = records.len();
        let items: Vec<Message> = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<RawMessage>(record) {
                Ok(raw) => Some(Message::from(raw)),
                Err(err) => {
                    warn!("Skipping malformed message record: {}", err);
                    None
                }
            })
            .collect();

        MessagePage {
            dropped: record_count - items.len(),
            items,
            end_cursor: page_info.end_cursor,
            has_next_page: page_info.has_next_page,
        }
    }
}

/// Fetches a single page of a channel's message log.
///
/// Implementations perform exactly one upstream call per invocation and never retry.
/// The cursor is always a token previously handed out by the upstream.
#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn fetch_page(&self, channel_id: &str, cursor: Option<&str>) -> Result<MessagePage, UpstreamError>;
}

#[async_trait]
impl MessageSource for UpstreamClient {
    async fn fetch_page(&self, channel_id: &str, cursor: Option<&str>) -> Result<MessagePage, UpstreamError> {
        let mut url = self.endpoint("messages")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &self.page_size.to_string());
            query.append_pair("channel_id", channel_id);
            if let Some(cursor) = cursor {
                query.append_pair("after", cursor);
            }
        }
        debug!("Fetching messages of {} (cursor: {})", channel_id, cursor.is_some());

        let response: MessagesResponse = self.send_json(self.get(url)).await?;
        Ok(MessagePage::from_response(response))
    }
}

impl From<RawMessage> for Message {
    fn from(raw: RawMessage) -> Self {
        let created_at = raw.created_at.as_ref().and_then(crate::messages::timestamp::normalize_timestamp);
        Message {
            id: raw.id,
            created_at,
            content: raw.content,
            author: raw.author,
            is_edited: raw.is_edited,
            is_pinned: raw.is_pinned,
        }
    }
}
