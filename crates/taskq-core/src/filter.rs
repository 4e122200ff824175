//! Storage-ready task filter.
//!
//! A [`TaskFilter`] is the output of the query language and the input of the
//! storage layer's list/count/bulk operations. Every dimension that is set
//! must hold for a task to match; there is no way to express OR.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Priority, TaskStatus};

/// Timestamp format used for storage bounds.
pub const SQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Filter on a single enumerated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum FieldFilter<T> {
    /// No constraint on this field.
    Unset,
    /// The field must equal the value.
    Equals(T),
    /// The field must differ from the value.
    NotEquals(T),
}

impl<T> Default for FieldFilter<T> {
    fn default() -> Self {
        FieldFilter::Unset
    }
}

impl<T> FieldFilter<T> {
    /// Returns true when the filter places no constraint.
    pub fn is_unset(&self) -> bool {
        matches!(self, FieldFilter::Unset)
    }
}

/// Filter on a nullable timestamp column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateFilter {
    /// No constraint on this column.
    #[default]
    NoFilter,
    /// The column must be null (`due:none`).
    MustBeNull,
    /// The column must fall inside the bounds; a missing bound is open.
    Range {
        /// Inclusive lower bound.
        from: Option<DateTime<Utc>>,
        /// Inclusive upper bound.
        to: Option<DateTime<Utc>>,
    },
}

impl DateFilter {
    /// Returns true when the filter places no constraint.
    pub fn is_no_filter(&self) -> bool {
        matches!(self, DateFilter::NoFilter)
    }

    /// Returns the bounds rendered as `YYYY-MM-DD HH:MM:SS`.
    ///
    /// Both bounds are `None` for `NoFilter` and `MustBeNull`; use
    /// [`DateFilter::is_no_filter`] or match on the variant to tell them apart.
    pub fn sql_bounds(&self) -> (Option<String>, Option<String>) {
        match self {
            DateFilter::Range { from, to } => (
                from.map(|d| d.format(SQL_DATETIME_FORMAT).to_string()),
                to.map(|d| d.format(SQL_DATETIME_FORMAT).to_string()),
            ),
            _ => (None, None),
        }
    }
}

/// Column used to order results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    Priority,
    DueDate,
    CreatedAt,
    Title,
}

/// Direction of ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Structured filter consumed by the storage layer.
///
/// Sort fields are passed through by callers; the query language never sets
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Status constraint.
    #[serde(default)]
    pub status: FieldFilter<TaskStatus>,

    /// Priority constraint.
    #[serde(default)]
    pub priority: FieldFilter<Priority>,

    /// Resolved project ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,

    /// Tags a task must carry (all of them).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Tags a task must not carry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_tags: Vec<String>,

    /// Due date constraint.
    #[serde(default)]
    pub due: DateFilter,

    /// Creation date constraint.
    #[serde(default)]
    pub created: DateFilter,

    /// Free-text search over title and description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub search_query: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,

    #[serde(default)]
    pub sort_order: SortOrder,
}

impl TaskFilter {
    /// Returns true if no dimension is constrained.
    pub fn is_empty(&self) -> bool {
        self.status.is_unset()
            && self.priority.is_unset()
            && self.project_id.is_none()
            && self.tags.is_empty()
            && self.exclude_tags.is_empty()
            && self.due.is_no_filter()
            && self.created.is_no_filter()
            && self.search_query.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_date_filter_sql_bounds() {
        let filter = DateFilter::Range {
            from: Some(at(2025, 1, 15, 0, 0, 0)),
            to: Some(at(2025, 1, 15, 23, 59, 59)),
        };
        let (from, to) = filter.sql_bounds();
        assert_eq!(from.as_deref(), Some("2025-01-15 00:00:00"));
        assert_eq!(to.as_deref(), Some("2025-01-15 23:59:59"));

        assert_eq!(DateFilter::MustBeNull.sql_bounds(), (None, None));
        assert_eq!(DateFilter::NoFilter.sql_bounds(), (None, None));
    }

    #[test]
    fn test_date_filter_null_is_distinct_from_no_filter() {
        assert_ne!(DateFilter::MustBeNull, DateFilter::NoFilter);
        assert!(DateFilter::NoFilter.is_no_filter());
        assert!(!DateFilter::MustBeNull.is_no_filter());
    }

    #[test]
    fn test_task_filter_default_is_empty() {
        let mut filter = TaskFilter::default();
        assert!(filter.is_empty());

        filter.due = DateFilter::MustBeNull;
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_task_filter_serializes_tagged_states() {
        let filter = TaskFilter {
            status: FieldFilter::NotEquals(TaskStatus::Completed),
            due: DateFilter::MustBeNull,
            ..Default::default()
        };
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["status"]["op"], "not_equals");
        assert_eq!(json["status"]["value"], "completed");
        assert_eq!(json["due"]["kind"], "must_be_null");
        assert_eq!(json["created"]["kind"], "no_filter");
    }
}
