//! Dashboard state management.
//!
//! Centralized state for one dashboard session: the thread list, the
//! overview, expansion and the per-thread email cache, and which fetches are
//! outstanding. [`DashboardState::handle`] is the only way to change it.

use std::collections::HashSet;

use chrono::NaiveDate;

use super::events::{DashboardEvent, Effect};
use crate::domain::{Email, EmailThread, ThreadId};
use crate::services::{ExpansionState, Overview};

/// What an expanded row should show beneath a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadEmails<'a> {
    /// The thread is not expanded.
    Collapsed,
    /// Expanded and its emails are still being fetched.
    Loading,
    /// Expanded and there is nothing to show (no emails, or the fetch failed).
    Empty,
    /// Expanded with cached emails, newest first.
    Loaded(&'a [Email]),
}

/// State of one dashboard session.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Day the session was mounted for.
    pub as_of: Option<NaiveDate>,
    /// Threads, newest first.
    pub threads: Vec<EmailThread>,
    /// Summary and trend, once loaded.
    pub overview: Option<Overview>,
    /// Expanded threads and cached emails.
    pub expansion: ExpansionState,
    /// Whether the thread list is being fetched.
    pub loading_threads: bool,
    /// Whether the overview is being fetched.
    pub loading_overview: bool,
    in_flight: HashSet<ThreadId>,
}

impl DashboardState {
    /// Create an unmounted state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an event and return the fetches it requires.
    pub fn handle(&mut self, event: DashboardEvent) -> Vec<Effect> {
        match event {
            DashboardEvent::Mounted { as_of } => {
                *self = Self {
                    as_of: Some(as_of),
                    loading_threads: true,
                    loading_overview: true,
                    ..Self::default()
                };
                vec![Effect::FetchThreads, Effect::FetchOverview { as_of }]
            }
            DashboardEvent::ThreadsLoaded(threads) => {
                self.threads = threads;
                self.loading_threads = false;
                Vec::new()
            }
            DashboardEvent::OverviewLoaded(overview) => {
                self.overview = Some(overview);
                self.loading_overview = false;
                Vec::new()
            }
            DashboardEvent::ToggleThread(thread_id) => self.toggle(thread_id),
            DashboardEvent::EmailsLoaded { thread_id, emails } => {
                self.in_flight.remove(&thread_id);
                if let Some(emails) = emails {
                    self.expansion =
                        std::mem::take(&mut self.expansion).with_emails(thread_id, emails);
                }
                Vec::new()
            }
        }
    }

    fn toggle(&mut self, thread_id: ThreadId) -> Vec<Effect> {
        let (expansion, fetch) = std::mem::take(&mut self.expansion).toggle(&thread_id);
        self.expansion = expansion;

        match fetch {
            Some(fetch) if self.in_flight.insert(fetch.thread_id.clone()) => {
                vec![Effect::FetchEmails(fetch.thread_id)]
            }
            Some(fetch) => {
                tracing::debug!(thread_id = %fetch.thread_id, "Email fetch already in flight");
                Vec::new()
            }
            None => {
                if self.expansion.is_expanded(&thread_id) {
                    tracing::debug!(%thread_id, "Using cached emails");
                }
                Vec::new()
            }
        }
    }

    /// Whether an email fetch is outstanding for the thread.
    pub fn is_fetching(&self, thread_id: &ThreadId) -> bool {
        self.in_flight.contains(thread_id)
    }

    /// Whether any initial fetch is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading_threads || self.loading_overview
    }

    /// What to show beneath a thread row.
    pub fn thread_emails(&self, thread_id: &ThreadId) -> ThreadEmails<'_> {
        if !self.expansion.is_expanded(thread_id) {
            return ThreadEmails::Collapsed;
        }
        match self.expansion.emails(thread_id) {
            Some([]) => ThreadEmails::Empty,
            Some(emails) => ThreadEmails::Loaded(emails),
            None if self.is_fetching(thread_id) => ThreadEmails::Loading,
            None => ThreadEmails::Empty,
        }
    }
}
