use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::upstream::{UpstreamClient, UpstreamError};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Owner or moderator of the company.
    Admin,
    Customer,
    #[default]
    NoAccess,
}

/// An empty answer grants nothing.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessDecision {
    pub has_access: bool,
    pub access_level: AccessLevel,
}

impl AccessDecision {
    pub fn is_admin(&self) -> bool {
        self.has_access && self.access_level == AccessLevel::Admin
    }
}

#[async_trait]
pub trait AccessChecker: Send + Sync {
    async fn check_company_access(&self, user_id: &str, company_id: &str) -> Result<AccessDecision, UpstreamError>;
}

#[async_trait]
impl AccessChecker for UpstreamClient {
    async fn check_company_access(&self, user_id: &str, company_id: &str) -> Result<AccessDecision, UpstreamError> {
        let mut url = self.endpoint("companies")?;
        url.path_segments_mut()
            .map_err(|_| UpstreamError::Transport("upstream api url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend([company_id, "access", user_id]);

        self.send_json(self.get(url)).await
    }
}
