use std::collections::HashSet;
use std::time::Duration;
use serde::Serialize;
use tokio::time::{sleep, sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use crate::core::{EarlyStop, PaginationConfig};
use crate::messages::{DateWindow, Message};
use crate::upstream::{MessagePage, MessageSource, UpstreamError};

/// Terminal state of a fetch session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopReason {
    /// The upstream returned a page without any records.
    StoppedEmpty,
    /// No continuation was offered, or fetching a page failed.
    StoppedNoMore,
    /// A whole page was older than the requested window.
    StoppedEarlyTermination,
    /// The page ceiling was reached.
    StoppedCeiling,
    /// The caller cancelled the session or its deadline passed.
    StoppedCancelled,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub max_pages: u32,
    pub inter_page_delay: Duration,
    pub early_stop: EarlyStop,
    pub deadline: Option<Instant>,
}

impl SessionOptions {

    pub fn from_config(config: &PaginationConfig) -> Self {
        SessionOptions {
            max_pages: config.max_pages,
            inter_page_delay: config.inter_page_delay(),
            early_stop: config.early_stop,
            deadline: Some(Instant::now() + config.session_timeout()),
        }
    }

    /// Short sessions used to sample which dates a channel has messages for.
    pub fn discovery(config: &PaginationConfig) -> Self {
        SessionOptions {
            max_pages: config.discovery_max_pages,
            ..Self::from_config(config)
        }
    }
}

#[derive(Debug)]
pub struct SessionOutcome {
    /// Newest first; messages without a timestamp trail in fetch order.
    pub messages: Vec<Message>,
    pub pages_processed: u32,
    pub stop_reason: StopReason,
    pub upstream_error: Option<UpstreamError>,
    /// Upstream records skipped because they could not be decoded.
    pub dropped_records: usize,
    /// Early termination was switched off because a page broke newest-first order.
    pub ordering_violated: bool,
}

impl SessionOutcome {
    pub fn truncated(&self) -> bool {
        self.stop_reason == StopReason::StoppedCeiling
    }

    pub fn incomplete(&self) -> bool {
        self.truncated() || self.upstream_error.is_some() || self.stop_reason == StopReason::StoppedCancelled
    }
}

/// Oldest and newest parseable timestamp of a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PageBounds {
    oldest: Option<i64>,
    newest: Option<i64>,
}

impl PageBounds {
    fn of(items: &[Message]) -> Self {
        let timestamps = items.iter().filter_map(|msg| msg.created_at);
        PageBounds {
            oldest: timestamps.clone().min(),
            newest: timestamps.max(),
        }
    }
}

/// Tracks whether the pages seen so far are consistent with newest-first delivery.
#[derive(Debug, Default)]
struct OrderingCheck {
    previous_oldest: Option<i64>,
    violated: bool,
}

impl OrderingCheck {

    /// Returns true when this page is the first one to break the order.
    fn observe(&mut self, items: &[Message], bounds: PageBounds) -> bool {
        let timestamps: Vec<i64> = items.iter().filter_map(|msg| msg.created_at).collect();
        let descending = timestamps.windows(2).all(|pair| pair[0] >= pair[1]);
        let continues = match (self.previous_oldest, bounds.newest) {
            (Some(previous), Some(newest)) => newest <= previous,
            _ => true,
        };
        if bounds.oldest.is_some() {
            self.previous_oldest = bounds.oldest;
        }

        if !self.violated && !(descending && continues) {
            self.violated = true;
            return true;
        }
        false
    }
}

/// One paginated read of a channel, filtered to an optional date window.
///
/// Pages are fetched strictly in sequence since every cursor comes out of the
/// previous response. The state lives for a single request and is consumed by [`FetchSession::run`].
pub struct FetchSession<'a> {
    source: &'a dyn MessageSource,
    channel_id: &'a str,
    window: Option<DateWindow>,
    options: SessionOptions,
    cancel: CancellationToken,
    cursor: Option<String>,
    pages_processed: u32,
    accumulator: Vec<Message>,
    seen_ids: HashSet<String>,
    dropped_records: usize,
    ordering: OrderingCheck,
}

impl<'a> FetchSession<'a> {

    pub fn new(
        source: &'a dyn MessageSource,
        channel_id: &'a str,
        window: Option<DateWindow>,
        options: SessionOptions,
        cancel: CancellationToken,
    ) -> Self {
        FetchSession {
            source,
            channel_id,
            window,
            options,
            cancel,
            cursor: None,
            pages_processed: 0,
            accumulator: Vec::new(),
            seen_ids: HashSet::new(),
            dropped_records: 0,
            ordering: OrderingCheck::default(),
        }
    }

    pub async fn run(mut self) -> SessionOutcome {
        let mut upstream_error = None;

        let stop_reason = loop {
            if self.pages_processed >= self.options.max_pages {
                warn!("Reached the page ceiling ({}) for {}, older messages might be missing.", self.options.max_pages, self.channel_id);
                break StopReason::StoppedCeiling;
            }
            if self.pages_processed > 0 && !self.pause().await {
                break StopReason::StoppedCancelled;
            }

            let page = match self.next_page().await {
                None => break StopReason::StoppedCancelled,
                Some(Ok(page)) => page,
                Some(Err(err)) => {
                    warn!("Fetching page {} of {} failed: {}", self.pages_processed + 1, self.channel_id, err);
                    upstream_error = Some(err);
                    break StopReason::StoppedNoMore;
                }
            };

            if page.items.is_empty() && page.dropped == 0 {
                break StopReason::StoppedEmpty;
            }
            self.pages_processed += 1;
            if page.dropped > 0 {
                warn!("Page {} of {}: skipped {} undecodable records.", self.pages_processed, self.channel_id, page.dropped);
                self.dropped_records += page.dropped;
            }

            let bounds = PageBounds::of(&page.items);
            if self.ordering.observe(&page.items, bounds) && self.options.early_stop == EarlyStop::Verified {
                warn!("Page {} of {} is not newest-first, early termination disabled for this session.", self.pages_processed, self.channel_id);
            }

            if let Some(window) = self.window {
                if let Some(newest) = bounds.newest {
                    if newest < window.start() && self.early_stop_allowed() {
                        debug!("Page {} of {} predates the window, stopping.", self.pages_processed, self.channel_id);
                        break StopReason::StoppedEarlyTermination;
                    }
                }
            }

            let next_cursor = page.continuation().map(str::to_string);
            let item_count = page.items.len();
            let matched = self.accumulate(page.items);
            debug!(
                "Page {} of {}: {} items, {} matching, oldest={:?}, newest={:?}",
                self.pages_processed, self.channel_id, item_count, matched, bounds.oldest, bounds.newest
            );

            match next_cursor {
                Some(cursor) => self.cursor = Some(cursor),
                None => break StopReason::StoppedNoMore,
            }
        };

        let mut messages = self.accumulator;
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        info!(
            "Fetched {} messages of {} from {} pages ({:?}).",
            messages.len(), self.channel_id, self.pages_processed, stop_reason
        );

        SessionOutcome {
            messages,
            pages_processed: self.pages_processed,
            stop_reason,
            upstream_error,
            dropped_records: self.dropped_records,
            ordering_violated: self.ordering.violated,
        }
    }

    fn early_stop_allowed(&self) -> bool {
        match self.options.early_stop {
            EarlyStop::Off => false,
            EarlyStop::AssumeOrdered => true,
            EarlyStop::Verified => !self.ordering.violated,
        }
    }

    /// Appends the page's in-window messages, skipping ids already collected.
    fn accumulate(&mut self, items: Vec<Message>) -> usize {
        let before = self.accumulator.len();
        for message in items {
            let in_window = match (self.window, message.created_at) {
                (None, _) => true,
                (Some(window), Some(ts)) => window.contains(ts),
                (Some(_), None) => false,
            };
            if in_window && self.seen_ids.insert(message.id.clone()) {
                self.accumulator.push(message);
            }
        }
        self.accumulator.len() - before
    }

    /// `None` when the session was interrupted while waiting for the upstream.
    async fn next_page(&self) -> Option<Result<MessagePage, UpstreamError>> {
        tokio::select! {
            biased;
            _ = interrupted(&self.cancel, self.options.deadline) => None,
            page = self.source.fetch_page(self.channel_id, self.cursor.as_deref()) => Some(page),
        }
    }

    /// Waits the inter-page delay; false when the session was interrupted meanwhile.
    async fn pause(&self) -> bool {
        tokio::select! {
            biased;
            _ = interrupted(&self.cancel, self.options.deadline) => false,
            _ = sleep(self.options.inter_page_delay) => true,
        }
    }
}

async fn interrupted(cancel: &CancellationToken, deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::select! {
            _ = cancel.cancelled() => {},
            _ = sleep_until(deadline) => {},
        },
        None => cancel.cancelled().await,
    }
}
