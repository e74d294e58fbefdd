//! Plain-text dashboard view.
//!
//! Draws the summary cards, sentiment distribution, negative trend and the
//! complaint table from a [`DashboardSnapshot`]. Formatting only.

use std::fmt::Write;

use chrono::{DateTime, FixedOffset, Utc};

use super::snapshot::{DashboardSnapshot, RowDetail, ThreadRow};
use crate::domain::{Email, Sentiment};

const TITLE: &str = "Customer Complaint Dashboard";
const MAX_BAR: usize = 40;
const EMPTY_DETAIL: &str = "No emails found";

/// Render the dashboard as text.
pub fn render(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();

    match snapshot.as_of {
        Some(as_of) => {
            let _ = writeln!(out, "{TITLE} (as of {})", as_of.format("%Y-%m-%d"));
        }
        None => {
            let _ = writeln!(out, "{TITLE}");
        }
    }
    out.push('\n');

    render_cards(&mut out, snapshot);
    render_distribution(&mut out, snapshot);
    render_trend(&mut out, snapshot);
    render_table(&mut out, snapshot);

    out
}

fn render_cards(out: &mut String, snapshot: &DashboardSnapshot) {
    let Some(summary) = snapshot.summary else {
        out.push_str("Loading overview...\n\n");
        return;
    };

    let cards = [
        ("Total Emails", summary.total),
        ("Positive", summary.positive),
        ("Neutral", summary.neutral),
        ("Negative", summary.negative),
    ];
    let header: Vec<_> = cards.iter().map(|(title, _)| format!("{title:>12}")).collect();
    let values: Vec<_> = cards.iter().map(|(_, n)| format!("{n:>12}")).collect();
    let _ = writeln!(out, "{}", header.join("  ").trim_end());
    let _ = writeln!(out, "{}", values.join("  ").trim_end());
    out.push('\n');
}

fn render_distribution(out: &mut String, snapshot: &DashboardSnapshot) {
    if snapshot.summary.is_none() {
        return;
    }

    out.push_str("Sentiment Distribution\n");
    if snapshot.distribution.is_empty() {
        out.push_str("  No classified emails\n");
    }
    for slice in &snapshot.distribution {
        let _ = writeln!(
            out,
            "  {:<9} {:>5}  ({:.1}%)",
            slice.sentiment.display_name(),
            slice.count,
            slice.percent
        );
    }
    out.push('\n');
}

fn render_trend(out: &mut String, snapshot: &DashboardSnapshot) {
    if snapshot.trend.is_empty() {
        return;
    }

    let _ = writeln!(
        out,
        "{} Trend (last {} days)",
        Sentiment::Negative.display_name(),
        snapshot.trend.len()
    );
    for point in &snapshot.trend {
        let bar = "#".repeat(point.count.min(MAX_BAR));
        let _ = writeln!(out, "  {:<7} {:>4}  {bar}", point.label, point.count);
    }
    out.push('\n');
}

fn render_table(out: &mut String, snapshot: &DashboardSnapshot) {
    out.push_str("Complaints\n");
    if snapshot.loading_threads {
        out.push_str("  Loading complaints...\n");
        return;
    }

    let _ = writeln!(
        out,
        "  {:<12} {:<17} {:<12} {}",
        "Thread ID", "Created", "Sentiment", "Status"
    );
    for row in &snapshot.threads {
        render_row(out, row, &snapshot.offset);
    }
    let _ = writeln!(out, "{}", snapshot.footer);
}

fn render_row(out: &mut String, row: &ThreadRow, offset: &FixedOffset) {
    let _ = writeln!(
        out,
        "  {:<12} {:<17} {:<12} {}",
        row.thread_id.as_str(),
        timestamp(&row.created_at, offset),
        row.sentiment.to_string(),
        row.status
    );

    match &row.detail {
        RowDetail::Collapsed => {}
        RowDetail::Loading => out.push_str("      Loading emails...\n"),
        RowDetail::Empty => {
            let _ = writeln!(out, "      {EMPTY_DETAIL}");
        }
        RowDetail::Loaded { emails } => {
            for email in emails {
                render_email(out, email, offset);
            }
        }
    }
}

fn render_email(out: &mut String, email: &Email, offset: &FixedOffset) {
    let _ = writeln!(
        out,
        "      {}  {}  {}  {}  {}",
        timestamp(&email.created_at, offset),
        or_dash(email.user.as_deref()),
        email.category.display_name(),
        or_dash(email.emotion.as_deref()),
        or_dash(email.department.as_deref())
    );
    if let Some(content) = email.content.as_deref() {
        let _ = writeln!(out, "        {content}");
    }
}

fn timestamp(at: &DateTime<Utc>, offset: &FixedOffset) -> String {
    at.with_timezone(offset).format("%Y-%m-%d %H:%M").to_string()
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
