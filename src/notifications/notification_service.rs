use std::sync::Arc;
use crate::core::AppState;
use crate::errors::{AppError, AppResponse};
use crate::notifications::{NewPushNotification, PushNotification, PushNotificationResponse};
use crate::utils::validate_channel_id;

pub struct NotificationService;

impl NotificationService {

    pub async fn send_push_notification(
        state: Arc<AppState>,
        payload: NewPushNotification,
        sender_user_id: String,
    ) -> AppResponse<PushNotificationResponse> {

        let notification = Self::build_notification(payload, sender_user_id)?;
        let result = state.notification_dispatcher.send_push_notification(&notification).await?;
        Ok(PushNotificationResponse { success: true, result })
    }

    fn build_notification(payload: NewPushNotification, sender_user_id: String) -> Result<PushNotification, AppError> {
        let (Some(title), Some(content)) = (present(payload.title), present(payload.content)) else {
            return Err(AppError::ValidationError("Title and content are required".to_string()));
        };
        let experience_id = present(payload.experience_id)
            .ok_or_else(|| AppError::ValidationError("Experience ID is required".to_string()))?;
        let experience_id = validate_channel_id(&experience_id)?.to_string();

        let user_ids = payload.user_ids
            .map(|ids| ids.into_iter().filter_map(|id| present(Some(id))).collect::<Vec<_>>())
            .filter(|ids| !ids.is_empty());

        Ok(PushNotification {
            experience_id,
            title,
            content,
            sender_user_id,
            company_team_id: present(payload.company_team_id),
            subtitle: present(payload.subtitle),
            link: present(payload.link),
            rest_path: present(payload.rest_path),
            user_ids,
        })
    }
}

/// Blank form fields count as not given.
fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> NewPushNotification {
        NewPushNotification {
            experience_id: Some("exp_123".into()),
            title: Some("Hello".into()),
            content: Some("New course is live".into()),
            ..Default::default()
        }
    }

    #[test]
    fn builds_a_notification_from_the_form() {
        let mut form = payload();
        form.subtitle = Some("  ".into());
        form.link = Some("https://example.com".into());
        form.user_ids = Some(vec!["user_1".into(), " ".into()]);

        let notification = NotificationService::build_notification(form, "user_sender".into()).unwrap();

        assert_eq!(notification.sender_user_id, "user_sender");
        assert_eq!(notification.subtitle, None);
        assert_eq!(notification.link.as_deref(), Some("https://example.com"));
        assert_eq!(notification.user_ids, Some(vec!["user_1".to_string()]));

        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["experienceId"], "exp_123");
        assert!(json.get("subtitle").is_none());
    }

    #[test]
    fn empty_recipient_lists_are_dropped() {
        let mut form = payload();
        form.user_ids = Some(vec![]);
        let notification = NotificationService::build_notification(form, "u".into()).unwrap();
        assert!(notification.user_ids.is_none());
    }

    #[test]
    fn requires_title_content_and_experience() {
        let mut form = payload();
        form.title = Some(" ".into());
        assert!(matches!(NotificationService::build_notification(form, "u".into()), Err(AppError::ValidationError(_))));

        let mut form = payload();
        form.content = None;
        assert!(matches!(NotificationService::build_notification(form, "u".into()), Err(AppError::ValidationError(_))));

        let mut form = payload();
        form.experience_id = None;
        assert!(matches!(NotificationService::build_notification(form, "u".into()), Err(AppError::ValidationError(_))));
    }
}
