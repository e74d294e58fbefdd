//! Sentiment aggregation over a flat email collection.
//!
//! Produces the numbers behind the dashboard cards and charts:
//! - Summary counts (total, positive, neutral, negative)
//! - Distribution slices for the pie chart
//! - A fixed four-day series of negative emails per calendar day

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::domain::{Email, Sentiment};

/// Number of calendar days in the trend window, ending at (and including) today.
pub const TREND_WINDOW_DAYS: usize = 4;

/// Counts of email sentiment across a collection.
///
/// `total` is always the size of the collection; emails with an unknown
/// category count toward `total` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentSummary {
    /// Number of emails considered.
    pub total: usize,
    /// Emails classified positive.
    pub positive: usize,
    /// Emails classified neutral.
    pub neutral: usize,
    /// Emails classified negative.
    pub negative: usize,
}

impl SentimentSummary {
    /// Returns the count for one sentiment bucket.
    pub fn count(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
            Sentiment::Unknown => self.unclassified(),
        }
    }

    /// Returns the number of emails with no recognized category.
    pub fn unclassified(&self) -> usize {
        self.total
            .saturating_sub(self.positive + self.neutral + self.negative)
    }

    /// Returns the non-empty classified buckets with their share of the
    /// classified emails, in positive/neutral/negative order.
    pub fn distribution(&self) -> Vec<SentimentSlice> {
        let classified = self.positive + self.neutral + self.negative;
        Sentiment::CLASSIFIED
            .iter()
            .map(|&sentiment| (sentiment, self.count(sentiment)))
            .filter(|&(_, count)| count > 0)
            .map(|(sentiment, count)| SentimentSlice {
                sentiment,
                count,
                percent: count as f64 / classified as f64 * 100.0,
            })
            .collect()
    }
}

/// One slice of the sentiment distribution chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSlice {
    /// Sentiment bucket.
    pub sentiment: Sentiment,
    /// Emails in the bucket.
    pub count: usize,
    /// Share of classified emails, 0-100.
    pub percent: f64,
}

/// Negative email count for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    /// Calendar day.
    pub date: NaiveDate,
    /// Negative emails created that day.
    pub count: usize,
}

impl TrendPoint {
    /// Short axis label, e.g. `Jul 20`.
    pub fn label(&self) -> String {
        self.date.format("%b %-d").to_string()
    }
}

/// Counts sentiment buckets across `emails`.
pub fn summarize(emails: &[Email]) -> SentimentSummary {
    emails.iter().fold(
        SentimentSummary {
            total: emails.len(),
            ..Default::default()
        },
        |mut summary, email| {
            match email.category {
                Sentiment::Positive => summary.positive += 1,
                Sentiment::Neutral => summary.neutral += 1,
                Sentiment::Negative => summary.negative += 1,
                Sentiment::Unknown => {}
            }
            summary
        },
    )
}

/// First calendar day of the trend window ending at `as_of`.
pub fn window_start(as_of: NaiveDate) -> NaiveDate {
    as_of - Duration::days(TREND_WINDOW_DAYS as i64 - 1)
}

/// Instant at which the trend window ending at `as_of` begins in `tz`.
pub fn window_start_instant<Tz: TimeZone>(as_of: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = window_start(as_of).and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

/// Negative emails per UTC calendar day for the window ending at `as_of`.
pub fn negative_trend(emails: &[Email], as_of: NaiveDate) -> Vec<TrendPoint> {
    negative_trend_in(emails, as_of, &Utc)
}

/// Negative emails per calendar day in `tz` for the window ending at `as_of`.
///
/// Always returns [`TREND_WINDOW_DAYS`] points in ascending date order. Emails
/// outside the window are ignored, so the input may be a superset.
pub fn negative_trend_in<Tz: TimeZone>(
    emails: &[Email],
    as_of: NaiveDate,
    tz: &Tz,
) -> Vec<TrendPoint> {
    let start = window_start(as_of);
    let mut points: Vec<TrendPoint> = (0..TREND_WINDOW_DAYS)
        .map(|offset| TrendPoint {
            date: start + Duration::days(offset as i64),
            count: 0,
        })
        .collect();

    for email in emails.iter().filter(|e| e.category == Sentiment::Negative) {
        let day = email.created_at.with_timezone(tz).date_naive();
        let offset = day.signed_duration_since(start).num_days();
        if (0..TREND_WINDOW_DAYS as i64).contains(&offset) {
            points[offset as usize].count += 1;
        }
    }

    points
}
