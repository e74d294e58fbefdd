//! Expand/collapse state for the complaint table.
//!
//! Tracks which threads are expanded and caches each thread's emails once they
//! have been fetched. Transitions are pure: they take the state by value and
//! hand back the next state plus any fetch the caller should dispatch. Fetching
//! itself lives in [`DashboardService`](super::DashboardService).

use std::collections::{HashMap, HashSet};

use crate::domain::{Email, ThreadId};
use crate::providers::store::EmailQuery;

/// Request to load the emails of one thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchEmails {
    /// Thread whose emails are needed.
    pub thread_id: ThreadId,
}

impl FetchEmails {
    /// Returns the store query for this request.
    pub fn query(&self) -> EmailQuery {
        EmailQuery::for_thread(self.thread_id.clone())
    }
}

/// Expanded threads and their cached emails.
///
/// A thread's email list is stored at most once per session; once present it
/// is never replaced or cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<ThreadId>,
    emails_by_thread: HashMap<ThreadId, Vec<Email>>,
}

impl ExpansionState {
    /// Creates an empty state with nothing expanded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips a thread between expanded and collapsed.
    ///
    /// Expanding a thread with no cached emails also returns a [`FetchEmails`]
    /// request. Collapsing never fetches and keeps the cache.
    pub fn toggle(mut self, thread_id: &ThreadId) -> (Self, Option<FetchEmails>) {
        if self.expanded.remove(thread_id) {
            return (self, None);
        }

        self.expanded.insert(thread_id.clone());
        let fetch = (!self.emails_by_thread.contains_key(thread_id)).then(|| FetchEmails {
            thread_id: thread_id.clone(),
        });
        (self, fetch)
    }

    /// Stores the emails fetched for a thread.
    ///
    /// Ignored if the thread already has cached emails.
    pub fn with_emails(mut self, thread_id: ThreadId, emails: Vec<Email>) -> Self {
        self.emails_by_thread.entry(thread_id).or_insert(emails);
        self
    }

    /// Returns true if the thread is expanded.
    pub fn is_expanded(&self, thread_id: &ThreadId) -> bool {
        self.expanded.contains(thread_id)
    }

    /// Returns the cached emails for a thread, if they have been fetched.
    pub fn emails(&self, thread_id: &ThreadId) -> Option<&[Email]> {
        self.emails_by_thread.get(thread_id).map(Vec::as_slice)
    }

    /// Returns the expanded thread ids.
    pub fn expanded(&self) -> &HashSet<ThreadId> {
        &self.expanded
    }

    /// Returns the number of threads with cached emails.
    pub fn cached_threads(&self) -> usize {
        self.emails_by_thread.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sentiment;
    use chrono::Utc;

    fn id(s: &str) -> ThreadId {
        ThreadId::from(s)
    }

    fn emails(thread: &str) -> Vec<Email> {
        vec![Email::new("e1", thread, Utc::now(), Sentiment::Negative)]
    }

    #[test]
    fn expanding_uncached_thread_requests_fetch() {
        let (state, fetch) = ExpansionState::new().toggle(&id("CPL001"));

        assert!(state.is_expanded(&id("CPL001")));
        assert_eq!(
            fetch,
            Some(FetchEmails {
                thread_id: id("CPL001")
            })
        );
        assert_eq!(fetch.unwrap().query(), EmailQuery::for_thread(id("CPL001")));
    }

    #[test]
    fn collapsing_keeps_cache() {
        let (state, _) = ExpansionState::new().toggle(&id("CPL001"));
        let state = state.with_emails(id("CPL001"), emails("CPL001"));

        let (state, fetch) = state.toggle(&id("CPL001"));
        assert!(fetch.is_none());
        assert!(!state.is_expanded(&id("CPL001")));
        assert_eq!(state.emails(&id("CPL001")).map(<[Email]>::len), Some(1));
    }

    #[test]
    fn re_expanding_cached_thread_does_not_fetch() {
        let (state, _) = ExpansionState::new().toggle(&id("CPL001"));
        let state = state.with_emails(id("CPL001"), emails("CPL001"));
        let (state, _) = state.toggle(&id("CPL001"));

        let (state, fetch) = state.toggle(&id("CPL001"));
        assert!(fetch.is_none());
        assert!(state.is_expanded(&id("CPL001")));
    }

    #[test]
    fn double_toggle_is_identity() {
        let (seeded, _) = ExpansionState::new().toggle(&id("CPL002"));
        let seeded = seeded.with_emails(id("CPL003"), emails("CPL003"));

        for start in [ExpansionState::new(), seeded] {
            for thread in ["CPL001", "CPL002", "CPL003"] {
                let (once, _) = start.clone().toggle(&id(thread));
                let (twice, _) = once.toggle(&id(thread));
                assert_eq!(twice, start, "thread {thread}");
            }
        }
    }

    #[test]
    fn emails_are_stored_only_once() {
        let state = ExpansionState::new()
            .with_emails(id("CPL001"), emails("CPL001"))
            .with_emails(id("CPL001"), Vec::new());

        assert_eq!(state.emails(&id("CPL001")).map(<[Email]>::len), Some(1));
        assert_eq!(state.cached_threads(), 1);
    }

    #[test]
    fn late_fetch_for_collapsed_thread_still_caches() {
        let (state, _) = ExpansionState::new().toggle(&id("CPL001"));
        let (state, _) = state.toggle(&id("CPL001"));
        let state = state.with_emails(id("CPL001"), emails("CPL001"));

        assert!(!state.is_expanded(&id("CPL001")));
        assert!(state.emails(&id("CPL001")).is_some());
    }

    #[test]
    fn threads_are_independent() {
        let (state, a) = ExpansionState::new().toggle(&id("CPL001"));
        let (state, b) = state.toggle(&id("CPL002"));

        assert!(a.is_some() && b.is_some());
        assert_eq!(state.expanded().len(), 2);
    }
}
