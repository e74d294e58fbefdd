//! sentimeter - Customer complaint monitoring dashboard
//!
//! This crate provides the core functionality for the sentimeter dashboard:
//! reading complaint threads and their emails from a remote table store,
//! aggregating email sentiment, managing the expandable complaint table, and
//! rendering the result.

pub mod app;
pub mod config;
pub mod domain;
pub mod providers;
pub mod services;
pub mod ui;

pub use app::{App, Dashboard, RunOptions};
