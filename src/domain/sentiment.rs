//! Sentiment and complaint status classifications.
//!
//! Both values are assigned upstream and arrive as free-form strings. They are
//! case-folded once when a row is ingested, and anything unrecognized becomes
//! `Unknown`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentiment classification of an email or thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// Customer is satisfied.
    Positive,
    /// Customer is neither satisfied nor upset.
    Neutral,
    /// Customer is upset.
    Negative,
    /// Missing or unrecognized classification.
    #[default]
    Unknown,
}

impl Sentiment {
    /// The three classified buckets, in display order.
    pub const CLASSIFIED: [Sentiment; 3] =
        [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// Parses a raw store value, ignoring case.
    ///
    /// Surrounding whitespace is not stripped, matching the store's
    /// case-insensitive `ilike` comparison.
    pub fn from_label(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "neutral" => Sentiment::Neutral,
            "negative" => Sentiment::Negative,
            _ => Sentiment::Unknown,
        }
    }

    /// Parses an optional raw value; absent values are `Unknown`.
    pub fn from_optional(raw: Option<&str>) -> Self {
        raw.map(Self::from_label).unwrap_or_default()
    }

    /// Returns the lowercase storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
            Sentiment::Unknown => "unknown",
        }
    }

    /// Returns the human-readable badge label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
            Sentiment::Unknown => "Unknown",
        }
    }

    /// Returns true for the three classified buckets.
    pub fn is_classified(&self) -> bool {
        !matches!(self, Sentiment::Unknown)
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a complaint thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintStatus {
    /// Awaiting action.
    Open,
    /// Closed out.
    Resolved,
    /// Waiting on a third party or the customer.
    Pending,
    /// Missing or unrecognized status.
    #[default]
    Unknown,
}

impl ComplaintStatus {
    /// Parses a raw store value, ignoring case and surrounding whitespace.
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "open" => ComplaintStatus::Open,
            "resolved" => ComplaintStatus::Resolved,
            "pending" => ComplaintStatus::Pending,
            _ => ComplaintStatus::Unknown,
        }
    }

    /// Parses an optional raw value; absent values are `Unknown`.
    pub fn from_optional(raw: Option<&str>) -> Self {
        raw.map(Self::from_label).unwrap_or_default()
    }

    /// Returns the human-readable badge label.
    pub fn display_name(&self) -> &'static str {
        match self {
            ComplaintStatus::Open => "Open",
            ComplaintStatus::Resolved => "Resolved",
            ComplaintStatus::Pending => "Pending",
            ComplaintStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_parsing_ignores_case() {
        for raw in ["Positive", "POSITIVE", "positive"] {
            assert_eq!(Sentiment::from_label(raw), Sentiment::Positive);
        }
        assert_eq!(Sentiment::from_label("NeGaTiVe"), Sentiment::Negative);
        assert_eq!(Sentiment::from_label("Neutral"), Sentiment::Neutral);
    }

    #[test]
    fn sentiment_unrecognized_is_unknown() {
        assert_eq!(Sentiment::from_label("angry"), Sentiment::Unknown);
        assert_eq!(Sentiment::from_label(""), Sentiment::Unknown);
        assert_eq!(Sentiment::from_label(" negative"), Sentiment::Unknown);
        assert_eq!(Sentiment::from_optional(None), Sentiment::Unknown);
        assert!(!Sentiment::Unknown.is_classified());
    }

    #[test]
    fn sentiment_serialization() {
        let json = serde_json::to_string(&Sentiment::Negative).unwrap();
        assert_eq!(json, "\"negative\"");

        let parsed: Sentiment = serde_json::from_str("\"neutral\"").unwrap();
        assert_eq!(parsed, Sentiment::Neutral);
    }

    #[test]
    fn status_parsing() {
        assert_eq!(ComplaintStatus::from_label("Open"), ComplaintStatus::Open);
        assert_eq!(
            ComplaintStatus::from_label("RESOLVED"),
            ComplaintStatus::Resolved
        );
        assert_eq!(
            ComplaintStatus::from_optional(Some("pending")),
            ComplaintStatus::Pending
        );
        assert_eq!(
            ComplaintStatus::from_label("escalated"),
            ComplaintStatus::Unknown
        );
    }

    #[test]
    fn display_names() {
        assert_eq!(Sentiment::Neutral.display_name(), "Neutral");
        assert_eq!(ComplaintStatus::Pending.to_string(), "Pending");
    }
}
