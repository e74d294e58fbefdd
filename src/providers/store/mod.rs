//! Complaint table store implementations.
//!
//! This module contains the [`TableStore`] trait and its implementations:
//!
//! - [`SupabaseStore`] - Supabase/PostgREST over HTTP
//! - [`MemoryStore`] - in-process vectors, for tests and embedding
//!
//! # Example
//!
//! ```ignore
//! use sentimeter::providers::store::{EmailQuery, SupabaseStore, TableStore};
//! use sentimeter::domain::ThreadId;
//!
//! async fn show_thread(store: &dyn TableStore) {
//!     let emails = store
//!         .fetch_emails(&EmailQuery::for_thread(ThreadId::from("CPL001")))
//!         .await
//!         .expect("failed to fetch emails");
//!
//!     for email in emails {
//!         println!("{}: {}", email.created_at, email.content.unwrap_or_default());
//!     }
//! }
//! ```

mod memory;
pub mod rows;
mod supabase;
mod traits;

pub use memory::MemoryStore;
pub use supabase::SupabaseStore;
pub use traits::{EmailQuery, Result, SortOrder, StoreError, TableStore};
