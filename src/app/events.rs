//! Dashboard events and the effects they request.
//!
//! Every change to [`DashboardState`](super::DashboardState) goes through a
//! [`DashboardEvent`]. Handling an event may return [`Effect`]s, which the
//! runtime turns into store reads whose results come back as further events.
//! Observers can follow along through the [`EventBus`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;

use crate::domain::{Email, EmailThread, ThreadId};
use crate::services::Overview;

/// Inputs to the dashboard state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// The dashboard was opened for the given day.
    Mounted {
        /// Day the trend window ends on.
        as_of: NaiveDate,
    },
    /// The thread list arrived (empty on failure).
    ThreadsLoaded(Vec<EmailThread>),
    /// The overview arrived (zeroed on failure).
    OverviewLoaded(Overview),
    /// The user clicked a thread row.
    ToggleThread(ThreadId),
    /// A thread email fetch finished.
    EmailsLoaded {
        thread_id: ThreadId,
        /// `None` when the fetch failed.
        emails: Option<Vec<Email>>,
    },
}

impl DashboardEvent {
    /// Short name for log output.
    pub fn kind(&self) -> &'static str {
        match self {
            DashboardEvent::Mounted { .. } => "mounted",
            DashboardEvent::ThreadsLoaded(_) => "threads_loaded",
            DashboardEvent::OverviewLoaded(_) => "overview_loaded",
            DashboardEvent::ToggleThread(_) => "toggle_thread",
            DashboardEvent::EmailsLoaded { .. } => "emails_loaded",
        }
    }
}

/// Store reads requested by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Read every thread.
    FetchThreads,
    /// Read the summary and trend for the window ending at `as_of`.
    FetchOverview { as_of: NaiveDate },
    /// Read one thread's emails.
    FetchEmails(ThreadId),
}

/// Subscriber ID for unsubscribing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Event handler function type.
pub type EventHandler = Arc<dyn Fn(&DashboardEvent) + Send + Sync>;

/// Event bus for publish-subscribe communication.
///
/// The runtime publishes every event just before the state applies it.
/// Thread-safe for use across async boundaries. Handlers run without the
/// subscriber lock held, so they may subscribe, unsubscribe or publish.
pub struct EventBus {
    handlers: Arc<Mutex<HashMap<u64, EventHandler>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Create a new event bus.
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Subscribe to all events.
    ///
    /// Returns a subscriber ID that can be used to unsubscribe.
    pub fn subscribe<F>(&self, handler: F) -> SubscriberId
    where
        F: Fn(&DashboardEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(handler));

        SubscriberId(id)
    }

    /// Unsubscribe from events.
    pub fn unsubscribe(&self, subscriber_id: SubscriberId) {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&subscriber_id.0);
    }

    /// Publish an event to all subscribers.
    ///
    /// Subscribers added or removed while the event is being delivered take
    /// effect from the next publish.
    pub fn publish(&self, event: &DashboardEvent) {
        let handlers: Vec<EventHandler> = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        for handler in handlers {
            handler(event);
        }
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            next_id: Arc::clone(&self.next_id),
        }
    }
}
