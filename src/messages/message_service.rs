use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use crate::core::AppState;
use crate::errors::{AppError, AppResponse};
use crate::messages::model::AVAILABLE_DATES_LIMIT;
use crate::messages::{DateWindow, FetchSession, MessageDatesResponse, MessageListing, ObservedDateRange, RequestedDateRange, SampledDateRange, SessionOptions, SessionOutcome, StopReason, UpstreamFailure};
use crate::utils::validate_channel_id;

pub struct MessageService;

impl MessageService {

    /// Lists a channel's messages, limited to one UTC day when `date` is given.
    ///
    /// Input is validated before any upstream call. A failing first page is an error since
    /// nothing could be read; failures after that yield a partial listing with `upstream_error` set.
    pub async fn list_messages(
        state: Arc<AppState>,
        channel_id: &str,
        date: Option<&str>,
        cancel: CancellationToken,
    ) -> AppResponse<MessageListing> {

        let channel_id = validate_channel_id(channel_id)?;
        let window = date.map(DateWindow::from_date_str).transpose()?;

        let options = SessionOptions::from_config(&state.env.pagination);
        let outcome = FetchSession::new(state.message_source.as_ref(), channel_id, window, options, cancel)
            .run()
            .await;
        let outcome = Self::fail_if_nothing_was_read(outcome)?;

        let observed_date_range = match window {
            Some(_) => None,
            None => ObservedDateRange::from_messages(&outcome.messages),
        };

        Ok(MessageListing {
            total_count: outcome.messages.len(),
            pages_processed: outcome.pages_processed,
            truncated: outcome.truncated(),
            incomplete: outcome.incomplete(),
            stop_reason: outcome.stop_reason,
            upstream_error: outcome.upstream_error.as_ref().map(UpstreamFailure::from),
            dropped_records: outcome.dropped_records,
            date_range: window.as_ref().map(RequestedDateRange::from),
            observed_date_range,
            items: outcome.messages,
        })
    }

    /// Samples the newest pages of a channel to find out which dates have messages.
    pub async fn discover_message_dates(
        state: Arc<AppState>,
        channel_id: &str,
        cancel: CancellationToken,
    ) -> AppResponse<MessageDatesResponse> {

        let channel_id = validate_channel_id(channel_id)?;

        let options = SessionOptions::discovery(&state.env.pagination);
        let outcome = FetchSession::new(state.message_source.as_ref(), channel_id, None, options, cancel)
            .run()
            .await;
        let outcome = Self::fail_if_nothing_was_read(outcome)?;

        let date_range = ObservedDateRange::from_messages(&outcome.messages).map(|observed| {
            let total_unique_dates = observed.distinct_dates.len();
            SampledDateRange {
                oldest: observed.oldest,
                newest: observed.newest,
                total_messages: observed.timestamped_count,
                pages_sampled: outcome.pages_processed,
                available_dates: observed.distinct_dates.into_iter().take(AVAILABLE_DATES_LIMIT).collect(),
                total_unique_dates,
            }
        });

        let message = match date_range {
            Some(_) => "Use one of the available dates for filtering",
            None => "No messages found",
        };

        Ok(MessageDatesResponse {
            experience_id: channel_id.to_string(),
            date_range,
            message: message.to_string(),
            incomplete: outcome.upstream_error.is_some() || outcome.stop_reason == StopReason::StoppedCancelled,
            upstream_error: outcome.upstream_error.as_ref().map(UpstreamFailure::from),
        })
    }

    fn fail_if_nothing_was_read(mut outcome: SessionOutcome) -> Result<SessionOutcome, AppError> {
        if outcome.pages_processed == 0 {
            if let Some(err) = outcome.upstream_error.take() {
                return Err(AppError::UpstreamUnavailable(err));
            }
        }
        Ok(outcome)
    }
}
