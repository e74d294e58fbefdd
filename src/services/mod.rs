//! Business services layer.
//!
//! This module contains the logic behind the dashboard, coordinating between
//! the store provider and domain types.
//!
//! # Architecture
//!
//! Services sit between the application layer and the infrastructure layer:
//!
//! ```text
//! Application Layer (State, Events, Rendering)
//!          |
//!          v
//!    Services Layer  <-- You are here
//!          |
//!          v
//! Infrastructure (Table store)
//! ```
//!
//! # Services Overview
//!
//! - [`DashboardService`]: Reads threads, thread emails and the overview from a store
//! - [`aggregator`]: Pure sentiment counts and the negative trend series
//! - [`ExpansionState`]: Expand/collapse transitions and the per-thread email cache
//! - [`ComplaintFilter`]: Search and sentiment filtering of the complaint table

pub mod aggregator;
mod complaints;
mod dashboard_service;
mod expansion;

pub use aggregator::{
    negative_trend, negative_trend_in, summarize, SentimentSlice, SentimentSummary, TrendPoint,
    TREND_WINDOW_DAYS,
};
pub use complaints::{ComplaintFilter, FilteredThreads, TableFooter};
pub use dashboard_service::{DashboardService, Overview};
pub use expansion::{ExpansionState, FetchEmails};
