use std::time::Duration;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use crate::core::UpstreamConfig;
use crate::errors::AppError;
use crate::upstream::UpstreamError;

/// Thin wrapper around the upstream REST api, shared by all outbound ports.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: Url,
    api_key: String,
    pub(crate) page_size: u32,
}

impl UpstreamClient {

    pub fn new(config: &UpstreamConfig) -> Result<Self, AppError> {
        //Url::join replaces the last path segment unless the base ends with a slash
        let mut base = config.api_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|err| {
            AppError::ProcessingError(format!("Invalid upstream api url '{}': {}", config.api_url, err))
        })?;
        if config.page_size == 0 {
            return Err(AppError::ProcessingError("upstream.page_size must be greater than zero".to_string()));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| AppError::ProcessingError(format!("Unable to build http client: {}", err)))?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
            page_size: config.page_size,
        })
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, UpstreamError> {
        self.base_url
            .join(path)
            .map_err(|err| UpstreamError::Transport(format!("invalid endpoint '{}': {}", path, err)))
    }

    pub(crate) fn get(&self, url: Url) -> RequestBuilder {
        self.authorized(self.http.get(url))
    }

    pub(crate) fn post(&self, url: Url) -> RequestBuilder {
        self.authorized(self.http.post(url))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.api_key)
    }

    /// Sends the request and decodes a success body; failures keep status and body.
    pub(crate) async fn send_json<T: DeserializeOwned + Default>(&self, request: RequestBuilder) -> Result<T, UpstreamError> {
        let response = request.send().await?;
        let status = response.status();
        debug!("Upstream answered with {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::from_status(status.as_u16(), body));
        }

        let bytes = response.bytes().await?;
        decode_body(&bytes)
    }
}

/// An empty or `null` success body decodes as `T::default()`.
fn decode_body<T: DeserializeOwned + Default>(bytes: &[u8]) -> Result<T, UpstreamError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    let decoded: Option<T> = serde_json::from_slice(bytes)?;
    Ok(decoded.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use crate::upstream::model::MessagesResponse;
    use super::*;

    fn config(api_url: &str) -> UpstreamConfig {
        UpstreamConfig {
            api_url: api_url.to_string(),
            api_key: "secret".to_string(),
            page_size: 100,
            request_timeout_secs: 5,
        }
    }

    #[test]
    fn joins_endpoints_below_the_versioned_base() {
        let client = UpstreamClient::new(&config("https://api.example.com/v1")).unwrap();
        let url = client.endpoint("messages").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/messages");
    }

    #[test]
    fn rejects_unparseable_base_urls() {
        assert!(UpstreamClient::new(&config("not a url")).is_err());
    }

    #[test]
    fn empty_and_null_bodies_decode_as_defaults() {
        let page: MessagesResponse = decode_body(b"  \n").unwrap();
        assert!(page.data.is_none());
        let page: MessagesResponse = decode_body(b"null").unwrap();
        assert!(page.page_info.is_none());
        let value: Value = decode_body(b"").unwrap();
        assert_eq!(value, Value::Null);

        let page: MessagesResponse = decode_body(br#"{"data": [{"id": "m1"}]}"#).unwrap();
        assert_eq!(page.data.map(|data| data.len()), Some(1));
        assert!(matches!(decode_body::<MessagesResponse>(b"<html>"), Err(UpstreamError::Decode(_))));
    }

    #[test]
    fn rejects_an_empty_page_size() {
        let mut config = config("https://api.example.com/v1");
        config.page_size = 0;
        assert!(UpstreamClient::new(&config).is_err());
    }
}
