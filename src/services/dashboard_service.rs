//! Dashboard data loading.
//!
//! Provides the fetch layer behind the dashboard:
//! - The complaint thread list
//! - Per-thread emails for expanded rows
//! - The overview (summary counts and negative trend)
//!
//! Each `load_*` method catches store failures, logs them, and resolves to an
//! empty result so the view never has to handle an error. The `try_*`
//! variants return the error for callers that want to surface it.

use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::Serialize;

use super::aggregator::{
    negative_trend_in, summarize, window_start_instant, SentimentSummary, TrendPoint,
};
use crate::domain::{Email, EmailThread, Sentiment, ThreadId};
use crate::providers::store::{EmailQuery, Result as StoreResult, TableStore};

/// Summary counts and negative trend for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    /// Day the trend window ends on.
    pub as_of: NaiveDate,
    /// Sentiment counts over all emails.
    pub summary: SentimentSummary,
    /// Negative emails per day over the trend window.
    pub trend: Vec<TrendPoint>,
}

impl Overview {
    /// Overview with zero counts and a zero-filled trend.
    pub fn empty(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            summary: SentimentSummary::default(),
            trend: negative_trend_in(&[], as_of, &Utc),
        }
    }
}

/// Service that reads dashboard data from a [`TableStore`].
pub struct DashboardService<S: TableStore> {
    store: Arc<S>,
    offset: FixedOffset,
}

impl<S: TableStore> DashboardService<S> {
    /// Creates a service that buckets days in UTC.
    pub fn new(store: S) -> Self {
        Self::from_arc(Arc::new(store))
    }

    /// Creates a service over a shared store.
    pub fn from_arc(store: Arc<S>) -> Self {
        Self {
            store,
            offset: Utc.fix(),
        }
    }

    /// Sets the UTC offset used to decide calendar days.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Returns the offset used to decide calendar days.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns today's date at the configured offset.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }

    /// Reads every thread, newest first.
    pub async fn try_load_threads(&self) -> StoreResult<Vec<EmailThread>> {
        self.store.fetch_threads().await
    }

    /// Reads every thread, newest first; empty on failure.
    pub async fn load_threads(&self) -> Vec<EmailThread> {
        match self.try_load_threads().await {
            Ok(threads) => {
                tracing::debug!(count = threads.len(), "Loaded threads");
                threads
            }
            Err(e) => {
                tracing::warn!(store = self.store.name(), "Error fetching threads: {}", e);
                Vec::new()
            }
        }
    }

    /// Reads the emails of one thread, newest first.
    pub async fn try_load_thread_emails(&self, thread_id: &ThreadId) -> StoreResult<Vec<Email>> {
        self.store
            .fetch_emails(&EmailQuery::for_thread(thread_id.clone()))
            .await
    }

    /// Reads the emails of one thread; `None` on failure.
    pub async fn load_thread_emails(&self, thread_id: &ThreadId) -> Option<Vec<Email>> {
        match self.try_load_thread_emails(thread_id).await {
            Ok(emails) => {
                tracing::debug!(%thread_id, count = emails.len(), "Loaded thread emails");
                Some(emails)
            }
            Err(e) => {
                tracing::warn!(
                    %thread_id,
                    store = self.store.name(),
                    "Error fetching emails: {}",
                    e
                );
                None
            }
        }
    }

    /// Builds the overview for the trend window ending at `as_of`.
    ///
    /// Issues two reads concurrently: every email for the summary, and the
    /// negative emails since the window start for the trend. A failed read
    /// leaves its half of the overview empty.
    pub async fn load_overview(&self, as_of: NaiveDate) -> Overview {
        let all = EmailQuery::all();
        let negatives = EmailQuery::all()
            .with_category(Sentiment::Negative)
            .since(window_start_instant(as_of, &self.offset));

        let (all_result, negative_result) = futures::join!(
            self.store.fetch_emails(&all),
            self.store.fetch_emails(&negatives)
        );

        let summary = match all_result {
            Ok(emails) => summarize(&emails),
            Err(e) => {
                tracing::warn!(store = self.store.name(), "Error fetching summary data: {}", e);
                SentimentSummary::default()
            }
        };

        let negative_emails = negative_result.unwrap_or_else(|e| {
            tracing::warn!(store = self.store.name(), "Error fetching trend data: {}", e);
            Vec::new()
        });

        Overview {
            as_of,
            summary,
            trend: negative_trend_in(&negative_emails, as_of, &self.offset),
        }
    }
}
