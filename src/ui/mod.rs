//! Dashboard presentation.
//!
//! The UI is organized into:
//! - `snapshot`: Render-ready view data, also used for JSON export
//! - `dashboard`: Plain-text rendering of a snapshot
//! - `badge`: Sentiment and status labels

pub mod badge;
pub mod dashboard;
pub mod snapshot;

pub use badge::{Badge, BadgeVariant};
pub use dashboard::render;
pub use snapshot::{DashboardSnapshot, RowDetail, ThreadRow, TrendRow};
