use std::sync::Arc;
use tracing::error;
use crate::core::AppState;
use crate::errors::AppError;
use crate::upstream::AccessDecision;

const MAX_IDENTIFIER_LEN: usize = 128;

/// Upstream ids look like `exp_AMVsGdHu1vbJYZ` or `biz_...`.
fn is_identifier(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_IDENTIFIER_LEN
        && value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

pub fn validate_channel_id(channel_id: &str) -> Result<&str, AppError> {
    let trimmed = channel_id.trim();
    if is_identifier(trimmed) {
        Ok(trimmed)
    } else if trimmed.is_empty() {
        Err(AppError::InvalidChannelId("experienceId is required".to_string()))
    } else {
        Err(AppError::InvalidChannelId(format!("'{}' is not a valid channel id", channel_id)))
    }
}

pub fn validate_company_id(company_id: &str) -> Result<&str, AppError> {
    let trimmed = company_id.trim();
    if is_identifier(trimmed) {
        Ok(trimmed)
    } else {
        Err(AppError::ValidationError("companyId is required and must be a valid id".to_string()))
    }
}

pub async fn load_company_access(
    state: &Arc<AppState>,
    user_id: &str,
    company_id: &str,
) -> Result<AccessDecision, AppError> {
    state
        .access_checker
        .check_company_access(user_id, company_id)
        .await
        .map_err(|err| {
            error!("Unable to check access of {} to {}: {}", user_id, company_id, err);
            AppError::UpstreamUnavailable(err)
        })
}

/// Only owners and moderators of a company may use its dashboard.
pub async fn check_company_admin(
    state: &Arc<AppState>,
    user_id: &str,
    company_id: &str,
) -> Result<(), AppError> {
    let decision = load_company_access(state, user_id, company_id).await?;
    if decision.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Only company administrators and moderators can view this page.".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::ErrorCode;
    use super::*;

    #[test]
    fn accepts_upstream_style_ids() {
        assert_eq!(validate_channel_id("exp_AMVsGdHu1vbJYZ").unwrap(), "exp_AMVsGdHu1vbJYZ");
        assert_eq!(validate_channel_id("  chan_123 ").unwrap(), "chan_123");
    }

    #[test]
    fn rejects_malformed_channel_ids() {
        let too_long = "a".repeat(129);
        for value in ["", "   ", "exp/../../admin", "exp 1", "exp?x=1", too_long.as_str()] {
            let err = validate_channel_id(value).unwrap_err();
            assert_eq!(err.kind(), ErrorCode::InvalidChannelId, "{value}");
        }
    }

    #[test]
    fn rejects_malformed_company_ids() {
        assert!(validate_company_id("biz_123").is_ok());
        assert_eq!(validate_company_id("").unwrap_err().kind(), ErrorCode::ValidationError);
    }
}
