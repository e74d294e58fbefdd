//! In-memory store implementation.
//!
//! Holds threads and emails in vectors behind locks and answers queries the
//! same way the remote store does. Used by tests and for embedding the
//! dashboard without a backend.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::traits::{EmailQuery, Result, SortOrder, TableStore};
use crate::domain::{Email, EmailThread};

/// In-memory implementation of [`TableStore`].
#[derive(Default)]
pub struct MemoryStore {
    threads: RwLock<Vec<EmailThread>>,
    emails: RwLock<Vec<Email>>,
    email_queries: RwLock<Vec<EmailQuery>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a thread (builder style).
    pub fn with_thread(self, thread: EmailThread) -> Self {
        self.insert_thread(thread);
        self
    }

    /// Adds an email (builder style).
    pub fn with_email(self, email: Email) -> Self {
        self.insert_email(email);
        self
    }

    /// Adds a thread.
    pub fn insert_thread(&self, thread: EmailThread) {
        self.threads
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(thread);
    }

    /// Adds an email.
    pub fn insert_email(&self, email: Email) {
        self.emails
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(email);
    }

    /// Returns every email query served so far, oldest first.
    pub fn email_queries(&self) -> Vec<EmailQuery> {
        self.email_queries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_threads(&self) -> Result<Vec<EmailThread>> {
        let mut threads = self
            .threads
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        threads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(threads)
    }

    async fn fetch_emails(&self, query: &EmailQuery) -> Result<Vec<Email>> {
        self.email_queries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());

        let mut emails: Vec<Email> = self
            .emails
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| query.matches(e))
            .cloned()
            .collect();

        match query.order {
            SortOrder::Descending => emails.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::Ascending => emails.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }
        Ok(emails)
    }
}
