//! Client-side filtering of the complaint table.

use serde::Serialize;

use super::ExpansionState;
use crate::domain::{EmailThread, Sentiment};

/// Search and sentiment filter applied to the thread list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    /// Case-insensitive search text.
    pub search: Option<String>,
    /// Only threads with this overall sentiment.
    pub sentiment: Option<Sentiment>,
}

impl ComplaintFilter {
    /// Creates a filter that matches every thread.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search text. Blank text clears the search.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.search = (!text.trim().is_empty()).then(|| text.trim().to_lowercase());
        self
    }

    /// Filters by thread sentiment.
    pub fn sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    /// Parses the sentiment selector value (`all`, `positive`, `neutral`, `negative`).
    pub fn parse_sentiment(raw: &str) -> Option<Option<Sentiment>> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("all") {
            return Some(None);
        }
        match Sentiment::from_label(raw) {
            Sentiment::Unknown => None,
            sentiment => Some(Some(sentiment)),
        }
    }

    /// Returns true if the thread passes the filter.
    ///
    /// Search text matches the thread id, or the text of any email already
    /// cached for the thread.
    pub fn matches(&self, thread: &EmailThread, expansion: &ExpansionState) -> bool {
        if let Some(sentiment) = self.sentiment {
            if thread.sentiment != sentiment {
                return false;
            }
        }
        if let Some(ref needle) = self.search {
            let in_id = thread.id.as_str().to_lowercase().contains(needle.as_str());
            let in_emails = expansion
                .emails(&thread.id)
                .is_some_and(|emails| emails.iter().any(|e| e.mentions(needle)));
            if !in_id && !in_emails {
                return false;
            }
        }
        true
    }

    /// Applies the filter to `threads`, keeping their order.
    pub fn apply<'a>(
        &self,
        threads: &'a [EmailThread],
        expansion: &ExpansionState,
    ) -> FilteredThreads<'a> {
        FilteredThreads {
            visible: threads
                .iter()
                .filter(|t| self.matches(t, expansion))
                .collect(),
            total: threads.len(),
        }
    }
}

/// Threads that passed a [`ComplaintFilter`].
#[derive(Debug, Clone)]
pub struct FilteredThreads<'a> {
    /// Matching threads, in list order.
    pub visible: Vec<&'a EmailThread>,
    /// Size of the unfiltered list.
    pub total: usize,
}

impl FilteredThreads<'_> {
    /// Footer counts for the table.
    pub fn footer(&self) -> TableFooter {
        TableFooter {
            shown: self.visible.len(),
            total: self.total,
        }
    }
}

/// "Showing N of M complaints".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableFooter {
    /// Rows shown after filtering.
    pub shown: usize,
    /// Rows before filtering.
    pub total: usize,
}

impl std::fmt::Display for TableFooter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Showing {} of {} complaints.", self.shown, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComplaintStatus, Email, ThreadId};
    use chrono::Utc;

    fn thread(id: &str, sentiment: Sentiment) -> EmailThread {
        EmailThread::new(id, Utc::now(), sentiment, ComplaintStatus::Open)
    }

    fn threads() -> Vec<EmailThread> {
        vec![
            thread("CPL001", Sentiment::Negative),
            thread("CPL002", Sentiment::Positive),
            thread("CPL003", Sentiment::Negative),
            thread("REF010", Sentiment::Neutral),
        ]
    }

    #[test]
    fn empty_filter_shows_everything() {
        let threads = threads();
        let filtered = ComplaintFilter::new().apply(&threads, &ExpansionState::new());
        assert_eq!(filtered.visible.len(), 4);
        assert_eq!(filtered.footer().to_string(), "Showing 4 of 4 complaints.");
    }

    #[test]
    fn sentiment_filter() {
        let threads = threads();
        let filtered = ComplaintFilter::new()
            .sentiment(Sentiment::Negative)
            .apply(&threads, &ExpansionState::new());

        let ids: Vec<_> = filtered.visible.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["CPL001", "CPL003"]);
        assert_eq!(filtered.footer(), TableFooter { shown: 2, total: 4 });
    }

    #[test]
    fn search_matches_thread_id_case_insensitively() {
        let threads = threads();
        let filtered = ComplaintFilter::new()
            .search("ref")
            .apply(&threads, &ExpansionState::new());

        assert_eq!(filtered.visible.len(), 1);
        assert_eq!(filtered.visible[0].id, ThreadId::from("REF010"));
    }

    #[test]
    fn search_matches_cached_email_text() {
        let threads = threads();
        let expansion = ExpansionState::new().with_emails(
            ThreadId::from("CPL002"),
            vec![Email::new("e1", "CPL002", Utc::now(), Sentiment::Negative)
                .with_content("I was charged twice for my order.")],
        );

        let filtered = ComplaintFilter::new()
            .search("Charged Twice")
            .apply(&threads, &expansion);

        assert_eq!(filtered.visible.len(), 1);
        assert_eq!(filtered.visible[0].id, ThreadId::from("CPL002"));
    }

    #[test]
    fn blank_search_is_ignored() {
        assert_eq!(ComplaintFilter::new().search("   ").search, None);
    }

    #[test]
    fn parse_sentiment_selector() {
        assert_eq!(ComplaintFilter::parse_sentiment("all"), Some(None));
        assert_eq!(
            ComplaintFilter::parse_sentiment("Negative"),
            Some(Some(Sentiment::Negative))
        );
        assert_eq!(
            ComplaintFilter::parse_sentiment(" neutral "),
            Some(Some(Sentiment::Neutral))
        );
        assert_eq!(ComplaintFilter::parse_sentiment("furious"), None);
    }
}
