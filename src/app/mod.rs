//! Application state and lifecycle management
//!
//! [`Dashboard`] owns one session: it feeds events into [`DashboardState`],
//! runs the fetches the state asks for as tokio tasks, and applies their
//! results as they complete. [`App`] wires settings, the store and the
//! renderer together for the command line.

mod events;
mod state;

pub use events::{DashboardEvent, Effect, EventBus, EventHandler, SubscriberId};
pub use state::{DashboardState, ThreadEmails};

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures::FutureExt;
use tokio::task::JoinSet;

use crate::config::Settings;
use crate::domain::ThreadId;
use crate::providers::store::{SupabaseStore, TableStore};
use crate::services::{ComplaintFilter, DashboardService, Overview};
use crate::ui::{self, DashboardSnapshot};

/// A running dashboard session.
pub struct Dashboard<S: TableStore + 'static> {
    service: Arc<DashboardService<S>>,
    state: DashboardState,
    bus: EventBus,
    tasks: JoinSet<DashboardEvent>,
}

impl<S: TableStore + 'static> Dashboard<S> {
    /// Create an unmounted session.
    pub fn new(service: DashboardService<S>) -> Self {
        Self {
            service: Arc::new(service),
            state: DashboardState::new(),
            bus: EventBus::new(),
            tasks: JoinSet::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Service the session reads through.
    pub fn service(&self) -> &DashboardService<S> {
        &self.service
    }

    /// Bus that sees every applied event.
    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    /// Number of fetches still running.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Open the dashboard for `as_of`, starting the initial fetches.
    ///
    /// Fetches left over from an earlier mount are aborted and their results
    /// never reach the new session.
    pub fn mount(&mut self, as_of: NaiveDate) {
        tracing::info!(%as_of, store = self.service.store().name(), "Mounting dashboard");
        if !self.tasks.is_empty() {
            tracing::debug!(stale = self.tasks.len(), "Discarding fetches from previous mount");
        }
        // dropping a JoinSet aborts every task in it
        self.tasks = JoinSet::new();
        self.apply(DashboardEvent::Mounted { as_of });
    }

    /// Open the dashboard for today at the configured offset.
    pub fn mount_today(&mut self) {
        let today = self.service.today();
        self.mount(today);
    }

    /// Expand or collapse a thread row.
    pub fn toggle(&mut self, thread_id: ThreadId) {
        self.apply(DashboardEvent::ToggleThread(thread_id));
    }

    /// Apply an event and start any fetches it requests.
    pub fn apply(&mut self, event: DashboardEvent) {
        tracing::debug!(event = event.kind(), "Applying event");
        self.bus.publish(&event);
        for effect in self.state.handle(event) {
            self.dispatch(effect);
        }
    }

    // Every spawned fetch resolves to an event, even if the load panics, so
    // loading flags and the in-flight guard always clear.
    fn dispatch(&mut self, effect: Effect) {
        let service = Arc::clone(&self.service);
        self.tasks.spawn(async move {
            match effect {
                Effect::FetchThreads => {
                    let threads = or_fallback("threads", service.load_threads(), Vec::new).await;
                    DashboardEvent::ThreadsLoaded(threads)
                }
                Effect::FetchOverview { as_of } => {
                    let overview = or_fallback("overview", service.load_overview(as_of), || {
                        Overview::empty(as_of)
                    })
                    .await;
                    DashboardEvent::OverviewLoaded(overview)
                }
                Effect::FetchEmails(thread_id) => {
                    let emails =
                        or_fallback("thread emails", service.load_thread_emails(&thread_id), || None)
                            .await;
                    DashboardEvent::EmailsLoaded { thread_id, emails }
                }
            }
        });
    }

    /// Wait for the next fetch to finish and apply its result.
    ///
    /// Returns false when nothing is pending.
    pub async fn next(&mut self) -> bool {
        match self.tasks.join_next().await {
            Some(Ok(event)) => {
                self.apply(event);
                true
            }
            Some(Err(e)) => {
                tracing::error!("Fetch task failed: {}", e);
                true
            }
            None => false,
        }
    }

    /// Apply results until no fetch is pending.
    pub async fn settle(&mut self) {
        while self.next().await {}
    }

    /// Capture the current view with `filter` applied to the table.
    pub fn snapshot(&self, filter: &ComplaintFilter) -> DashboardSnapshot {
        DashboardSnapshot::capture(&self.state, filter, self.service.offset())
    }
}

/// Run a load, substituting `fallback()` if it panics.
async fn or_fallback<T>(
    what: &str,
    load: impl Future<Output = T>,
    fallback: impl FnOnce() -> T,
) -> T {
    match AssertUnwindSafe(load).catch_unwind().await {
        Ok(value) => value,
        Err(_) => {
            tracing::error!("Loading {} panicked", what);
            fallback()
        }
    }
}

/// What the command line asked to see.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Table filter.
    pub filter: ComplaintFilter,
    /// Threads to expand, in order.
    pub expand: Vec<ThreadId>,
    /// Emit a JSON snapshot instead of text.
    pub json: bool,
    /// Day to mount for; today when `None`.
    pub as_of: Option<NaiveDate>,
}

/// Main application entry point
pub struct App;

impl App {
    /// Connect to the configured store and render the dashboard.
    pub async fn run(settings: &Settings, options: RunOptions) -> Result<String> {
        settings.validate().context("invalid configuration")?;
        let offset = settings.dashboard.offset()?;
        let store = SupabaseStore::from_settings(&settings.store)
            .context("failed to create store client")?;
        tracing::info!(url = %store.rest_url(), "Using store");

        Self::present(DashboardService::new(store).with_offset(offset), options).await
    }

    /// Mount a session over `service`, apply the requested expansions once
    /// the initial data is in, and render the result.
    pub async fn present<S: TableStore + 'static>(
        service: DashboardService<S>,
        options: RunOptions,
    ) -> Result<String> {
        let mut dashboard = Dashboard::new(service);
        match options.as_of {
            Some(as_of) => dashboard.mount(as_of),
            None => dashboard.mount_today(),
        }
        dashboard.settle().await;

        for thread_id in options.expand {
            dashboard.toggle(thread_id);
        }
        dashboard.settle().await;

        let snapshot = dashboard.snapshot(&options.filter);
        if options.json {
            snapshot.to_json().context("failed to serialize dashboard")
        } else {
            Ok(ui::render(&snapshot))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComplaintStatus, Email, EmailThread, Sentiment};
    use crate::providers::store::{self, EmailQuery, MemoryStore};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 20).unwrap()
    }

    fn service() -> DashboardService<MemoryStore> {
        let at = Utc.with_ymd_and_hms(2024, 7, 19, 9, 0, 0).unwrap();
        DashboardService::new(
            MemoryStore::new()
                .with_thread(EmailThread::new(
                    "CPL001",
                    at,
                    Sentiment::Negative,
                    ComplaintStatus::Open,
                ))
                .with_email(Email::new("e1", "CPL001", at, Sentiment::Negative))
                .with_email(Email::new("e2", "CPL001", at, Sentiment::Neutral)),
        )
    }

    fn thread_fetches(dashboard: &Dashboard<MemoryStore>) -> usize {
        dashboard
            .service()
            .store()
            .email_queries()
            .iter()
            .filter(|q| q.thread_id.is_some())
            .count()
    }

    #[tokio::test]
    async fn mount_loads_threads_and_overview() {
        let mut dashboard = Dashboard::new(service());
        dashboard.mount(as_of());
        assert_eq!(dashboard.pending(), 2);

        dashboard.settle().await;
        assert_eq!(dashboard.pending(), 0);
        assert!(!dashboard.state().is_loading());
        assert_eq!(dashboard.state().threads.len(), 1);

        let overview = dashboard.state().overview.as_ref().unwrap();
        assert_eq!(overview.summary.total, 2);
        assert_eq!(overview.trend[2].count, 1);
    }

    #[tokio::test]
    async fn expand_collapse_expand_fetches_once() {
        let mut dashboard = Dashboard::new(service());
        dashboard.mount(as_of());
        dashboard.settle().await;

        let id = ThreadId::from("CPL001");
        dashboard.toggle(id.clone());
        dashboard.settle().await;
        dashboard.toggle(id.clone());
        dashboard.toggle(id.clone());
        dashboard.settle().await;

        assert_eq!(thread_fetches(&dashboard), 1);
        assert!(matches!(
            dashboard.state().thread_emails(&id),
            ThreadEmails::Loaded(emails) if emails.len() == 2
        ));
        assert_eq!(
            dashboard.service().store().email_queries().last(),
            Some(&EmailQuery::for_thread(id))
        );
    }

    #[tokio::test]
    async fn rapid_toggles_issue_one_fetch() {
        let mut dashboard = Dashboard::new(service());
        let id = ThreadId::from("CPL001");

        dashboard.toggle(id.clone());
        dashboard.toggle(id.clone());
        dashboard.toggle(id.clone());
        assert_eq!(dashboard.pending(), 1);

        dashboard.settle().await;
        assert_eq!(thread_fetches(&dashboard), 1);
        assert!(dashboard.state().expansion.is_expanded(&id));
    }

    #[tokio::test]
    async fn remount_discards_earlier_fetches() {
        let mut dashboard = Dashboard::new(service());
        let id = ThreadId::from("CPL001");

        dashboard.mount(as_of());
        dashboard.toggle(id.clone());
        assert_eq!(dashboard.pending(), 3);

        let next_day = as_of().succ_opt().unwrap();
        dashboard.mount(next_day);
        assert_eq!(dashboard.pending(), 2);

        dashboard.settle().await;
        let state = dashboard.state();
        assert_eq!(state.as_of, Some(next_day));
        assert!(!state.expansion.is_expanded(&id));
        assert!(state.expansion.emails(&id).is_none());
        assert!(!state.is_fetching(&id));
        assert_eq!(state.overview.as_ref().unwrap().as_of, next_day);
    }

    /// Serves threads normally but panics on any per-thread email read.
    struct PanickingStore(MemoryStore);

    #[async_trait]
    impl TableStore for PanickingStore {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn fetch_threads(&self) -> store::Result<Vec<EmailThread>> {
            self.0.fetch_threads().await
        }

        async fn fetch_emails(&self, query: &EmailQuery) -> store::Result<Vec<Email>> {
            if query.thread_id.is_some() {
                panic!("thread read exploded");
            }
            self.0.fetch_emails(query).await
        }
    }

    #[tokio::test]
    async fn panicking_fetch_clears_in_flight_guard() {
        let at = Utc.with_ymd_and_hms(2024, 7, 19, 9, 0, 0).unwrap();
        let store = PanickingStore(
            MemoryStore::new()
                .with_thread(EmailThread::new(
                    "CPL001",
                    at,
                    Sentiment::Negative,
                    ComplaintStatus::Open,
                ))
                .with_email(Email::new("e1", "CPL001", at, Sentiment::Negative)),
        );
        let mut dashboard = Dashboard::new(DashboardService::new(store));
        dashboard.mount(as_of());
        dashboard.settle().await;

        let id = ThreadId::from("CPL001");
        dashboard.toggle(id.clone());
        dashboard.settle().await;

        let state = dashboard.state();
        assert!(state.expansion.is_expanded(&id));
        assert!(!state.is_fetching(&id));
        assert_eq!(state.thread_emails(&id), ThreadEmails::Empty);
        assert_eq!(state.overview.as_ref().unwrap().summary.total, 1);
    }

    #[tokio::test]
    async fn next_without_pending_returns_false() {
        let mut dashboard = Dashboard::new(service());
        assert!(!dashboard.next().await);
    }

    #[tokio::test]
    async fn bus_sees_every_event() {
        let mut dashboard = Dashboard::new(service());
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        let _sub = dashboard.events().subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        dashboard.mount(as_of());
        dashboard.settle().await;

        // mounted, threads loaded, overview loaded
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn present_renders_text_and_json() {
        let options = RunOptions {
            expand: vec![ThreadId::from("CPL001")],
            as_of: Some(as_of()),
            ..Default::default()
        };
        let text = App::present(service(), options.clone()).await.unwrap();
        assert!(text.contains("CPL001"));
        assert!(text.contains("Showing 1 of 1 complaints."));

        let json = App::present(
            service(),
            RunOptions {
                json: true,
                ..options
            },
        )
        .await
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["threads"][0]["detail"]["state"], "loaded");
        assert_eq!(value["summary"]["negative"], 1);
    }

    #[tokio::test]
    async fn run_rejects_missing_store_url() {
        let result = App::run(&Settings::default(), RunOptions::default()).await;
        assert!(result.is_err());
    }
}
