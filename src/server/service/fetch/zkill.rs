//! zKillboard scope pagination.
//!
//! Recent windows (up to a week) use the `pastSeconds` modifier; deeper lookbacks walk calendar
//! months from the newest back to the month containing `since`. Either way the cursor yields
//! pages lazily so the orchestrator can persist each page before asking for the next.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use super::UpstreamHttp;
use crate::server::{
    error::fetch::FetchError,
    model::{
        killmail::{FetchedEntry, ZkillEntry},
        pipeline::Scope,
    },
    util::time::months_between,
};

/// Longest window zKillboard accepts for `pastSeconds`.
pub const PAST_SECONDS_MAX: i64 = 604_800;
/// `pastSeconds` values are rounded up to whole hours to keep URLs cache friendly.
const PAST_SECONDS_GRANULARITY: i64 = 3600;

pub struct ZkillClient {
    http: UpstreamHttp,
    base_url: String,
    page_size: usize,
    max_pages: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Window {
    PastSeconds(i64),
    Month(i32, u32),
}

impl ZkillClient {
    pub fn new(http: UpstreamHttp, base_url: &str, page_size: usize, max_pages: u32) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            page_size,
            max_pages,
        }
    }

    /// Start paginating a scope's killmails back to `since`.
    pub fn pages(&self, scope: Scope, since: DateTime<Utc>, now: DateTime<Utc>) -> PageCursor<'_> {
        let span = (now - since).num_seconds();

        let windows = if span <= PAST_SECONDS_MAX {
            let hours = (span.max(1) + PAST_SECONDS_GRANULARITY - 1) / PAST_SECONDS_GRANULARITY;
            let rounded = hours * PAST_SECONDS_GRANULARITY;
            VecDeque::from([Window::PastSeconds(rounded.min(PAST_SECONDS_MAX))])
        } else {
            months_between(since, now)
                .into_iter()
                .map(|(year, month)| Window::Month(year, month))
                .collect()
        };

        PageCursor {
            client: self,
            scope,
            since,
            windows,
            page: 0,
            truncated: false,
        }
    }

    fn url(&self, scope: &Scope, window: Window, page: u32) -> String {
        match window {
            Window::PastSeconds(seconds) => format!(
                "{}/api/{}/{}/pastSeconds/{}/page/{}/",
                self.base_url,
                scope.modifier(),
                scope.id(),
                seconds,
                page
            ),
            Window::Month(year, month) => format!(
                "{}/api/{}/{}/year/{}/month/{}/page/{}/",
                self.base_url,
                scope.modifier(),
                scope.id(),
                year,
                month,
                page
            ),
        }
    }
}

/// Lazy page sequence for one scope.
pub struct PageCursor<'a> {
    client: &'a ZkillClient,
    scope: Scope,
    since: DateTime<Utc>,
    /// Remaining windows, newest first.
    windows: VecDeque<Window>,
    /// Last page requested within the current window.
    page: u32,
    /// A window was abandoned at the page cap with older killmails left unfetched.
    truncated: bool,
}

impl PageCursor<'_> {
    /// Fetch the next non-empty page.
    ///
    /// Entries known to predate `since` are dropped; summaries are kept since their time is only
    /// known after hydration.
    ///
    /// # Returns
    /// - `Ok(Some(entries))` - Next page of entries
    /// - `Ok(None)` - The scope is exhausted back to `since`
    /// - `Err(FetchError)` - The page could not be fetched or failed validation; the cursor
    ///   should not be polled again
    pub async fn next_page(&mut self) -> Result<Option<Vec<FetchedEntry>>, FetchError> {
        loop {
            let Some(&window) = self.windows.front() else {
                return Ok(None);
            };

            if self.page >= self.client.max_pages {
                tracing::warn!(
                    scope = %self.scope,
                    "Stopped paging after {} pages; older killmails in this window were not fetched",
                    self.page
                );
                self.truncated = true;
                self.next_window();
                continue;
            }

            self.page += 1;
            let url = self.client.url(&self.scope, window, self.page);
            let raw: Vec<ZkillEntry> = self.client.http.get_json(&url).await?;

            if raw.is_empty() {
                self.next_window();
                continue;
            }

            let short_page = raw.len() < self.client.page_size;

            let mut entries = raw
                .into_iter()
                .map(FetchedEntry::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|reason| FetchError::Malformed {
                    url: url.clone(),
                    reason,
                })?;

            let since = self.since;
            let all_older = entries
                .iter()
                .all(|entry| entry.occurred_at().is_some_and(|at| at < since));
            if all_older {
                // Windows run newest first, so nothing further back can be newer
                self.windows.clear();
                return Ok(None);
            }

            entries.retain(|entry| entry.occurred_at().is_none_or(|at| at >= since));

            if short_page {
                self.next_window();
            }

            tracing::debug!(
                scope = %self.scope,
                "Fetched page {} with {} entries",
                self.page,
                entries.len()
            );

            return Ok(Some(entries));
        }
    }

    /// Whether any window hit the page cap. A truncated scope was not fetched back to `since`.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// End the scope after the current page.
    ///
    /// For when the caller learned, after hydrating summaries, that the page already reaches
    /// back past `since`.
    pub fn finish(&mut self) {
        self.windows.clear();
    }

    fn next_window(&mut self) {
        self.windows.pop_front();
        self.page = 0;
    }
}
