//! Wire rows as returned by the store, and their normalization into domain types.
//!
//! The store hands back loosely typed JSON: ids may be strings or integers,
//! classifications use arbitrary casing, and timestamps may or may not carry an
//! offset. Everything is normalized here so the rest of the crate only sees
//! typed records.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::domain::{ComplaintStatus, Email, EmailId, EmailThread, Sentiment, ThreadId};

/// Table holding one row per complaint thread.
pub const THREAD_TABLE: &str = "EmailThread";

/// Table holding one row per email.
pub const EMAIL_TABLE: &str = "Email";

/// An identifier column that may be text or an integer.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    /// Text identifier.
    Text(String),
    /// Numeric identifier.
    Number(i64),
}

impl RawId {
    fn into_string(self) -> Option<String> {
        match self {
            RawId::Text(s) => non_blank(Some(s)),
            RawId::Number(n) => Some(n.to_string()),
        }
    }
}

/// A row of the `EmailThread` table.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailThreadRow {
    pub thread_id: Option<RawId>,
    pub created_at: Option<String>,
    pub thread_sentiment: Option<String>,
    pub complaint_status: Option<String>,
}

impl EmailThreadRow {
    /// Converts the row, or returns `None` if the id or timestamp is unusable.
    pub fn into_domain(self) -> Option<EmailThread> {
        let id = self.thread_id.and_then(RawId::into_string)?;
        let created_at = parse_timestamp(self.created_at.as_deref()?)?;

        Some(EmailThread {
            id: ThreadId(id),
            created_at,
            sentiment: Sentiment::from_optional(self.thread_sentiment.as_deref()),
            status: ComplaintStatus::from_optional(self.complaint_status.as_deref()),
        })
    }
}

/// A row of the `Email` table.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailRow {
    pub email_id: Option<RawId>,
    pub thread_id: Option<RawId>,
    pub created_at: Option<String>,
    pub user: Option<String>,
    pub email_content: Option<String>,
    pub category: Option<String>,
    pub sub_class: Option<String>,
    pub department: Option<String>,
}

impl EmailRow {
    /// Converts the row, or returns `None` if an id or the timestamp is unusable.
    pub fn into_domain(self) -> Option<Email> {
        let id = self.email_id.and_then(RawId::into_string)?;
        let thread_id = self.thread_id.and_then(RawId::into_string)?;
        let created_at = parse_timestamp(self.created_at.as_deref()?)?;

        Some(Email {
            id: EmailId(id),
            thread_id: ThreadId(thread_id),
            created_at,
            user: non_blank(self.user),
            content: non_blank(self.email_content),
            category: Sentiment::from_optional(self.category.as_deref()),
            emotion: non_blank(self.sub_class),
            department: non_blank(self.department),
        })
    }
}

/// Normalizes thread rows, dropping unusable ones.
pub fn normalize_threads(rows: Vec<EmailThreadRow>) -> Vec<EmailThread> {
    let total = rows.len();
    let threads: Vec<_> = rows
        .into_iter()
        .filter_map(EmailThreadRow::into_domain)
        .collect();

    if threads.len() < total {
        tracing::warn!(
            dropped = total - threads.len(),
            table = THREAD_TABLE,
            "Dropped rows without an id or a valid created_at"
        );
    }
    threads
}

/// Normalizes email rows, dropping unusable ones.
pub fn normalize_emails(rows: Vec<EmailRow>) -> Vec<Email> {
    let total = rows.len();
    let emails: Vec<_> = rows
        .into_iter()
        .filter_map(EmailRow::into_domain)
        .collect();

    if emails.len() < total {
        tracing::warn!(
            dropped = total - emails.len(),
            table = EMAIL_TABLE,
            "Dropped rows without an id or a valid created_at"
        );
    }
    emails
}

/// Parses a store timestamp.
///
/// Accepts RFC 3339 (with `Z` or a numeric offset) and naive timestamps with a
/// `T` or space separator, which are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Postgres text output for timestamptz: "2024-07-20 18:30:00+00"
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
