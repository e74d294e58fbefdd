//! Badge labels.
//!
//! Short status indicators shown in the complaint table.

use std::fmt;

use serde::Serialize;

use crate::domain::{ComplaintStatus, Sentiment};

/// Badge variant styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    /// Default neutral badge.
    #[default]
    Default,
    /// Success/positive badge.
    Success,
    /// Warning badge.
    Warning,
    /// Error/danger badge.
    Error,
    /// Muted/subtle badge.
    Muted,
}

/// A labelled badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    /// Text shown inside the badge.
    pub label: String,
    /// Style hint.
    pub variant: BadgeVariant,
}

impl Badge {
    /// Create a new badge with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            variant: BadgeVariant::Default,
        }
    }

    /// Set the badge variant.
    pub fn variant(mut self, variant: BadgeVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Badge for a sentiment value.
    pub fn sentiment(sentiment: Sentiment) -> Self {
        let variant = match sentiment {
            Sentiment::Positive => BadgeVariant::Success,
            Sentiment::Neutral => BadgeVariant::Default,
            Sentiment::Negative => BadgeVariant::Error,
            Sentiment::Unknown => BadgeVariant::Muted,
        };
        Self::new(sentiment.display_name()).variant(variant)
    }

    /// Badge for a complaint status.
    pub fn status(status: ComplaintStatus) -> Self {
        let variant = match status {
            ComplaintStatus::Open => BadgeVariant::Error,
            ComplaintStatus::Pending => BadgeVariant::Warning,
            ComplaintStatus::Resolved => BadgeVariant::Success,
            ComplaintStatus::Unknown => BadgeVariant::Muted,
        };
        Self::new(status.display_name()).variant(variant)
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_builder() {
        let badge = Badge::new("Label").variant(BadgeVariant::Warning);
        assert_eq!(badge.label, "Label");
        assert_eq!(badge.variant, BadgeVariant::Warning);
        assert_eq!(badge.to_string(), "[Label]");
    }

    #[test]
    fn sentiment_badges() {
        assert_eq!(Badge::sentiment(Sentiment::Negative).to_string(), "[Negative]");
        assert_eq!(
            Badge::sentiment(Sentiment::Positive).variant,
            BadgeVariant::Success
        );
        assert_eq!(Badge::sentiment(Sentiment::Unknown).label, "Unknown");
    }

    #[test]
    fn status_badges() {
        assert_eq!(Badge::status(ComplaintStatus::Open).to_string(), "[Open]");
        assert_eq!(
            Badge::status(ComplaintStatus::Pending).variant,
            BadgeVariant::Warning
        );
        assert_eq!(
            Badge::status(ComplaintStatus::Resolved).variant,
            BadgeVariant::Success
        );
    }
}
