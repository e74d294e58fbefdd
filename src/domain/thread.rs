//! Complaint thread domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ComplaintStatus, Sentiment, ThreadId};

/// A complaint thread. Read-only from the dashboard's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailThread {
    /// Unique identifier for this thread.
    pub id: ThreadId,
    /// When the complaint was opened.
    pub created_at: DateTime<Utc>,
    /// Overall sentiment of the thread.
    pub sentiment: Sentiment,
    /// Complaint lifecycle status.
    pub status: ComplaintStatus,
}

impl EmailThread {
    /// Creates a new thread record.
    pub fn new(
        id: impl Into<ThreadId>,
        created_at: DateTime<Utc>,
        sentiment: Sentiment,
        status: ComplaintStatus,
    ) -> Self {
        Self {
            id: id.into(),
            created_at,
            sentiment,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_serialization() {
        let thread = EmailThread::new(
            "CPL002",
            Utc::now(),
            Sentiment::Positive,
            ComplaintStatus::Resolved,
        );

        let json = serde_json::to_string(&thread).unwrap();
        assert!(json.contains("\"resolved\""));

        let deserialized: EmailThread = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, thread);
    }
}
