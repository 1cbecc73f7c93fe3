use std::sync::Arc;
use tracing::debug;
use crate::chats::{ChatChannel, ChatList};
use crate::core::AppState;
use crate::errors::AppResponse;
use crate::upstream::model::Experience;

pub struct ChatService;

impl ChatService {

    /// The company's experiences that belong to the configured chat app.
    pub async fn list_chats(state: Arc<AppState>, company_id: &str) -> AppResponse<ChatList> {
        let experiences = state.experience_source.list_experiences(company_id).await?;
        let chats = Self::chat_channels(experiences, &state.env.chat_app_id);
        debug!("Company {} has {} chat channels", company_id, chats.len());

        Ok(ChatList {
            total: chats.len(),
            chats,
        })
    }

    fn chat_channels(experiences: Vec<Experience>, chat_app_id: &str) -> Vec<ChatChannel> {
        experiences
            .into_iter()
            .filter(|exp| exp.app.as_ref().is_some_and(|app| app.id == chat_app_id))
            .map(ChatChannel::from)
            .collect()
    }
}
