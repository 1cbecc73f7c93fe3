use serde::{Deserialize, Serialize};
use crate::upstream::model::Experience;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatChannel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub logo: Option<String>,
}

impl From<Experience> for ChatChannel {
    fn from(experience: Experience) -> Self {
        ChatChannel {
            id: experience.id,
            name: experience.name.filter(|name| !name.trim().is_empty()).unwrap_or_else(|| "Unnamed Chat".to_string()),
            description: experience.description.unwrap_or_default(),
            logo: experience.logo.and_then(|logo| logo.source_url),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ChatList {
    pub chats: Vec<ChatChannel>,
    pub total: usize,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatsQueryParam {
    #[serde(default)]
    pub company_id: String,
}
