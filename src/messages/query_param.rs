use serde::Deserialize;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MessagesQueryParam {
    #[serde(default)]
    pub experience_id: String,
    pub date: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatActivityQueryParam {
    #[serde(default)]
    pub chat_experience_id: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MessageDatesQueryParam {
    #[serde(default)]
    pub experience_id: String,
}

/// Browsers submit an untouched date input as `date=`.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
