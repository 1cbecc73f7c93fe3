use async_trait::async_trait;
use crate::upstream::model::{Experience, ExperiencesResponse};
use crate::upstream::{UpstreamClient, UpstreamError};

/// Upper bound of experiences requested per company.
const EXPERIENCE_LIMIT: u32 = 100;

#[async_trait]
pub trait ExperienceSource: Send + Sync {
    async fn list_experiences(&self, company_id: &str) -> Result<Vec<Experience>, UpstreamError>;
}

#[async_trait]
impl ExperienceSource for UpstreamClient {
    async fn list_experiences(&self, company_id: &str) -> Result<Vec<Experience>, UpstreamError> {
        let mut url = self.endpoint("experiences")?;
        url.query_pairs_mut()
            .append_pair("company_id", company_id)
            .append_pair("first", &EXPERIENCE_LIMIT.to_string());

        let response: ExperiencesResponse = self.send_json(self.get(url)).await?;
        Ok(response.data.unwrap_or_default())
    }
}
