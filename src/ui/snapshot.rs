//! Render-ready view of the dashboard.
//!
//! A [`DashboardSnapshot`] is what the text renderer draws and what the JSON
//! export emits. It is built from the session state plus the table filter.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

use super::badge::Badge;
use crate::app::{DashboardState, ThreadEmails};
use crate::domain::{Email, ThreadId};
use crate::services::{ComplaintFilter, SentimentSlice, SentimentSummary, TableFooter};

/// Everything shown on the dashboard at one moment.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    /// Day the trend window ends on.
    pub as_of: Option<NaiveDate>,
    /// Summary cards; `None` while the overview is loading.
    pub summary: Option<SentimentSummary>,
    /// Pie chart slices.
    pub distribution: Vec<SentimentSlice>,
    /// Negative trend series.
    pub trend: Vec<TrendRow>,
    /// Whether the thread list is still loading.
    pub loading_threads: bool,
    /// Visible table rows.
    pub threads: Vec<ThreadRow>,
    /// Table footer counts.
    pub footer: TableFooter,
    /// Offset used for displayed times.
    #[serde(skip)]
    pub offset: FixedOffset,
}

/// One point of the trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendRow {
    pub date: NaiveDate,
    /// Axis label, e.g. `Jul 20`.
    pub label: String,
    pub count: usize,
}

/// One complaint table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadRow {
    pub thread_id: ThreadId,
    pub created_at: DateTime<Utc>,
    pub sentiment: Badge,
    pub status: Badge,
    /// What is shown beneath the row.
    pub detail: RowDetail,
}

/// Content of the expanded area beneath a thread row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RowDetail {
    Collapsed,
    Loading,
    /// Shown as "No emails found".
    Empty,
    Loaded { emails: Vec<Email> },
}

impl DashboardSnapshot {
    /// Build a snapshot of `state` with `filter` applied to the table.
    pub fn capture(state: &DashboardState, filter: &ComplaintFilter, offset: FixedOffset) -> Self {
        let filtered = filter.apply(&state.threads, &state.expansion);

        let threads = filtered
            .visible
            .iter()
            .map(|thread| ThreadRow {
                thread_id: thread.id.clone(),
                created_at: thread.created_at,
                sentiment: Badge::sentiment(thread.sentiment),
                status: Badge::status(thread.status),
                detail: match state.thread_emails(&thread.id) {
                    ThreadEmails::Collapsed => RowDetail::Collapsed,
                    ThreadEmails::Loading => RowDetail::Loading,
                    ThreadEmails::Empty => RowDetail::Empty,
                    ThreadEmails::Loaded(emails) => RowDetail::Loaded {
                        emails: emails.to_vec(),
                    },
                },
            })
            .collect();

        let overview = state.overview.as_ref();
        Self {
            as_of: state.as_of,
            summary: overview.map(|o| o.summary),
            distribution: overview
                .map(|o| o.summary.distribution())
                .unwrap_or_default(),
            trend: overview
                .map(|o| {
                    o.trend
                        .iter()
                        .map(|p| TrendRow {
                            date: p.date,
                            label: p.label(),
                            count: p.count,
                        })
                        .collect()
                })
                .unwrap_or_default(),
            loading_threads: state.loading_threads,
            threads,
            footer: filtered.footer(),
            offset,
        }
    }

    /// Serialize the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
