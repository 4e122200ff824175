//! Common helper functions for output formatting.

use owo_colors::OwoColorize;
use taskq_core::filter::{DateFilter, FieldFilter};
use taskq_core::models::{Priority, TaskStatus};
use taskq_query::date::format_display_date;

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats a priority for display.
pub fn format_priority(priority: Priority, use_colors: bool) -> String {
    let label = priority.as_str();
    if use_colors {
        match priority {
            Priority::Urgent => label.red().to_string(),
            Priority::High => label.yellow().to_string(),
            Priority::Medium => label.blue().to_string(),
            Priority::Low => label.dimmed().to_string(),
        }
    } else {
        label.to_string()
    }
}

/// Formats a task status for display.
pub fn format_status(status: TaskStatus, use_colors: bool) -> String {
    let label = status.as_str();
    if use_colors {
        match status {
            TaskStatus::Pending => label.to_string(),
            TaskStatus::InProgress => label.cyan().to_string(),
            TaskStatus::Completed => label.green().to_string(),
            TaskStatus::Cancelled => label.dimmed().to_string(),
        }
    } else {
        label.to_string()
    }
}

/// Formats an enum field constraint as `= value` or `!= value`.
pub fn format_field_filter<T: Copy>(
    filter: &FieldFilter<T>,
    render: impl Fn(T) -> String,
) -> Option<String> {
    match *filter {
        FieldFilter::Unset => None,
        FieldFilter::Equals(v) => Some(format!("= {}", render(v))),
        FieldFilter::NotEquals(v) => Some(format!("!= {}", render(v))),
    }
}

/// Formats a date constraint for display.
pub fn format_date_filter(filter: &DateFilter) -> Option<String> {
    match filter {
        DateFilter::NoFilter => None,
        DateFilter::MustBeNull => Some("none".to_string()),
        DateFilter::Range { from, to } => {
            let text = match (from, to) {
                (Some(f), Some(t)) if f.date_naive() == t.date_naive() => {
                    format!("on {}", format_display_date(*f))
                }
                (Some(f), Some(t)) => format!(
                    "{} .. {}",
                    format_display_date(*f),
                    format_display_date(*t)
                ),
                (Some(f), None) => format!("on or after {}", format_display_date(*f)),
                (None, Some(t)) => format!("on or before {}", format_display_date(*t)),
                (None, None) => "any".to_string(),
            };
            Some(text)
        }
    }
}

/// Formats a tag list as `#a #b`.
pub fn format_tags(tags: &[String], prefix: &str) -> String {
    tags.iter()
        .map(|t| format!("{prefix}{t}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("this is long", 10), "this is...");
        assert_eq!(truncate_str("ééééééééééé", 5), "éé...");
    }

    #[test]
    fn test_format_priority_no_colors() {
        assert_eq!(format_priority(Priority::Urgent, false), "urgent");
        assert_eq!(format_priority(Priority::Low, false), "low");
    }

    #[test]
    fn test_format_status_no_colors() {
        assert_eq!(format_status(TaskStatus::InProgress, false), "in_progress");
    }

    #[test]
    fn test_format_field_filter() {
        let render = |s: TaskStatus| s.to_string();
        assert_eq!(format_field_filter(&FieldFilter::Unset, render), None);
        assert_eq!(
            format_field_filter(&FieldFilter::Equals(TaskStatus::Pending), render).as_deref(),
            Some("= pending")
        );
        assert_eq!(
            format_field_filter(&FieldFilter::NotEquals(TaskStatus::Completed), render).as_deref(),
            Some("!= completed")
        );
    }

    #[test]
    fn test_format_date_filter() {
        let day = |d| Utc.with_ymd_and_hms(2025, 3, d, 0, 0, 0).unwrap();
        let end = |d| Utc.with_ymd_and_hms(2025, 3, d, 23, 59, 59).unwrap();

        assert_eq!(format_date_filter(&DateFilter::NoFilter), None);
        assert_eq!(
            format_date_filter(&DateFilter::MustBeNull).as_deref(),
            Some("none")
        );
        assert_eq!(
            format_date_filter(&DateFilter::Range {
                from: Some(day(10)),
                to: Some(end(10)),
            })
            .as_deref(),
            Some("on 2025-03-10")
        );
        assert_eq!(
            format_date_filter(&DateFilter::Range {
                from: Some(day(10)),
                to: Some(end(17)),
            })
            .as_deref(),
            Some("2025-03-10 .. 2025-03-17")
        );
        assert_eq!(
            format_date_filter(&DateFilter::Range {
                from: None,
                to: Some(end(31)),
            })
            .as_deref(),
            Some("on or before 2025-03-31")
        );
    }

    #[test]
    fn test_format_tags() {
        assert_eq!(format_tags(&[], "#"), "");
        assert_eq!(
            format_tags(&["bug".to_string(), "ui".to_string()], "-#"),
            "-#bug -#ui"
        );
    }
}
