//! Error types for query parsing and conversion.

use taskq_core::LookupError;
use thiserror::Error;

/// A specialized Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur while parsing or converting a query.
///
/// Syntax errors are raised by the parser, before any lookup happens.
/// Resolution errors are raised by the converter when a project reference
/// cannot be matched. Either kind aborts the whole query.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// A field was given a value outside its vocabulary.
    #[error("invalid {field} '{value}' (expected one of: {expected})")]
    InvalidFieldValue {
        /// The field name (`status`, `priority`).
        field: String,
        /// The rejected value.
        value: String,
        /// Accepted values, comma-separated.
        expected: String,
    },

    /// A recognized field had nothing after the operator.
    #[error("missing value for '{field}'")]
    MissingValue {
        /// The field name.
        field: String,
    },

    /// A field that cannot be negated was prefixed with `-`.
    #[error("'{field}' cannot be negated")]
    UnsupportedNegation {
        /// The field name.
        field: String,
    },

    /// A date expression is not in the supported vocabulary.
    #[error("unrecognized date expression: '{expression}'")]
    InvalidDate {
        /// The rejected expression.
        expression: String,
    },

    /// A date range is malformed.
    #[error("invalid date range '{value}': {reason}")]
    InvalidDateRange {
        /// The rejected range.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No project has the given name (or alias).
    #[error("project not found: '{name}'")]
    ProjectNotFound {
        /// The name that was looked up.
        name: String,
    },

    /// No project scored at or above the fuzzy threshold.
    #[error("no project matches '{term}' (fuzzy score threshold {threshold})")]
    NoFuzzyMatch {
        /// The search term.
        term: String,
        /// The minimum accepted score.
        threshold: u8,
    },

    /// Two project references resolved to different projects.
    #[error("conflicting project references: '{first}' and '{second}' resolve to different projects")]
    ConflictingProjects {
        /// The reference resolved first.
        first: String,
        /// The reference that disagreed with it.
        second: String,
    },

    /// The project lookup failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl QueryError {
    /// Creates a missing value error.
    pub fn missing_value(field: impl Into<String>) -> Self {
        QueryError::MissingValue {
            field: field.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(expression: impl Into<String>) -> Self {
        QueryError::InvalidDate {
            expression: expression.into(),
        }
    }

    /// Creates an invalid date range error.
    pub fn invalid_range(value: impl Into<String>, reason: impl Into<String>) -> Self {
        QueryError::InvalidDateRange {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates a project not found error.
    pub fn project_not_found(name: impl Into<String>) -> Self {
        QueryError::ProjectNotFound { name: name.into() }
    }

    /// Returns true for errors caused by the query text itself rather than
    /// by resolving it against stored projects.
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            QueryError::InvalidFieldValue { .. }
                | QueryError::MissingValue { .. }
                | QueryError::UnsupportedNegation { .. }
                | QueryError::InvalidDate { .. }
                | QueryError::InvalidDateRange { .. }
        )
    }
}

impl From<taskq_core::models::ParseEnumError> for QueryError {
    fn from(err: taskq_core::models::ParseEnumError) -> Self {
        QueryError::InvalidFieldValue {
            field: err.kind.to_string(),
            value: err.value,
            expected: err.expected,
        }
    }
}
