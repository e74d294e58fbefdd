//! Email domain types.
//!
//! Represents one classified customer message inside a complaint thread.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EmailId, Sentiment, ThreadId};

/// An individual email belonging to a complaint thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// Unique identifier for this email.
    pub id: EmailId,
    /// Thread this email belongs to.
    pub thread_id: ThreadId,
    /// When the email was sent.
    pub created_at: DateTime<Utc>,
    /// Customer who wrote the email.
    pub user: Option<String>,
    /// Message body.
    pub content: Option<String>,
    /// Sentiment classification.
    pub category: Sentiment,
    /// Emotion label (stored as `sub_class`).
    pub emotion: Option<String>,
    /// Department the complaint was routed to.
    pub department: Option<String>,
}

impl Email {
    /// Creates an email with only the required fields set.
    pub fn new(
        id: impl Into<EmailId>,
        thread_id: impl Into<ThreadId>,
        created_at: DateTime<Utc>,
        category: Sentiment,
    ) -> Self {
        Self {
            id: id.into(),
            thread_id: thread_id.into(),
            created_at,
            user: None,
            content: None,
            category,
            emotion: None,
            department: None,
        }
    }

    /// Sets the sender.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the message body.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the emotion label.
    pub fn with_emotion(mut self, emotion: impl Into<String>) -> Self {
        self.emotion = Some(emotion.into());
        self
    }

    /// Sets the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Returns true if the content, sender or department contains `needle`
    /// (already lowercased).
    pub(crate) fn mentions(&self, needle: &str) -> bool {
        [&self.content, &self.user, &self.department]
            .into_iter()
            .flatten()
            .any(|text| text.to_lowercase().contains(needle))
    }
}
