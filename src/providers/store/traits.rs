//! Table store trait definition.
//!
//! This module defines the [`TableStore`] trait which abstracts over the remote
//! complaint store. The dashboard only ever reads: every thread ordered by
//! creation time, and emails narrowed by an [`EmailQuery`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Email, EmailThread, Sentiment, ThreadId};

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while reading from the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Network or connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// The request did not complete in time.
    #[error("request timed out")]
    Timeout,

    /// The store answered with a non-success status.
    #[error("store error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message reported by the store.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The store client is misconfigured.
    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),
}

/// Sort direction on `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest first.
    #[default]
    Descending,
    /// Oldest first.
    Ascending,
}

impl SortOrder {
    /// Returns the PostgREST direction keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Descending => "desc",
            SortOrder::Ascending => "asc",
        }
    }
}

/// Filter options for reading emails.
///
/// Each set field narrows the result with an equality (or lower-bound) match;
/// an empty query selects the whole table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailQuery {
    /// Only emails in this thread.
    pub thread_id: Option<ThreadId>,
    /// Only emails with this category, compared case-insensitively with no
    /// whitespace trimming on either side.
    pub category: Option<Sentiment>,
    /// Only emails created at or after this instant.
    pub created_since: Option<DateTime<Utc>>,
    /// Sort direction on `created_at`.
    pub order: SortOrder,
}

impl EmailQuery {
    /// Selects every email, newest first.
    pub fn all() -> Self {
        Self::default()
    }

    /// Selects the emails of one thread, newest first.
    pub fn for_thread(thread_id: ThreadId) -> Self {
        Self {
            thread_id: Some(thread_id),
            ..Default::default()
        }
    }

    /// Filters by category.
    pub fn with_category(mut self, category: Sentiment) -> Self {
        self.category = Some(category);
        self
    }

    /// Filters to emails created at or after `since`.
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.created_since = Some(since);
        self
    }

    /// Sorts oldest first.
    pub fn ascending(mut self) -> Self {
        self.order = SortOrder::Ascending;
        self
    }

    /// Returns true if the email satisfies every filter in this query.
    pub fn matches(&self, email: &Email) -> bool {
        if let Some(ref thread_id) = self.thread_id {
            if &email.thread_id != thread_id {
                return false;
            }
        }
        if let Some(category) = self.category {
            if email.category != category {
                return false;
            }
        }
        if let Some(since) = self.created_since {
            if email.created_at < since {
                return false;
            }
        }
        true
    }
}

/// Read-only access to the complaint tables.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Returns a short name for log output.
    fn name(&self) -> &str;

    /// Reads every thread, newest first.
    async fn fetch_threads(&self) -> Result<Vec<EmailThread>>;

    /// Reads the emails matching `query`, sorted as the query requests.
    async fn fetch_emails(&self, query: &EmailQuery) -> Result<Vec<Email>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn email(thread: &str, day: u32, category: Sentiment) -> Email {
        Email::new(
            format!("{thread}-{day}"),
            thread,
            Utc.with_ymd_and_hms(2024, 7, day, 12, 0, 0).unwrap(),
            category,
        )
    }

    #[test]
    fn empty_query_matches_everything() {
        let query = EmailQuery::all();
        assert!(query.matches(&email("CPL001", 20, Sentiment::Positive)));
        assert!(query.matches(&email("CPL002", 1, Sentiment::Unknown)));
        assert_eq!(query.order, SortOrder::Descending);
    }

    #[test]
    fn thread_filter() {
        let query = EmailQuery::for_thread(ThreadId::from("CPL001"));
        assert!(query.matches(&email("CPL001", 20, Sentiment::Positive)));
        assert!(!query.matches(&email("CPL002", 20, Sentiment::Positive)));
    }

    #[test]
    fn category_and_since_filters() {
        let since = Utc.with_ymd_and_hms(2024, 7, 18, 0, 0, 0).unwrap();
        let query = EmailQuery::all()
            .with_category(Sentiment::Negative)
            .since(since);

        assert!(query.matches(&email("CPL001", 18, Sentiment::Negative)));
        assert!(!query.matches(&email("CPL001", 17, Sentiment::Negative)));
        assert!(!query.matches(&email("CPL001", 19, Sentiment::Neutral)));
    }

    #[test]
    fn query_builders() {
        let query = EmailQuery::for_thread(ThreadId::from("CPL003"))
            .with_category(Sentiment::Neutral)
            .ascending();

        assert_eq!(query.thread_id, Some(ThreadId::from("CPL003")));
        assert_eq!(query.category, Some(Sentiment::Neutral));
        assert_eq!(query.order.as_str(), "asc");
    }
}
