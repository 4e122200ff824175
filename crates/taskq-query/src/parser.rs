//! Field filter parser.
//!
//! Recognizes `field:value` clauses among the tokens left after project
//! mentions are extracted, and folds every other token into free text.
//!
//! # Grammar
//!
//! ```text
//! query      ::= token*
//! token      ::= mention | clause | word
//! mention    ::= "@" name | "@~" name
//! clause     ::= ["-"] ("status" | "priority" | "tag") ":" value
//!              | "project" ":" value
//!              | ("due" | "created") date_op date_value
//! date_op    ::= ":" | "<" | ">" | ":<" | ":>"
//! date_value ::= date | date ".." date | date ".." | ".." date
//! ```
//!
//! Field names and enum values are case-insensitive. Tag names, project
//! names and free text keep their case.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskq_core::filter::{DateFilter, FieldFilter};
use taskq_core::models::{Priority, TaskStatus};
use tracing::debug;

use crate::date::{parse_date_range_at, validate_date_range, DateOperator};
use crate::error::{QueryError, QueryResult};
use crate::mention::{parse_project_mentions, tokenize, ProjectMention};

/// Prefix that negates a clause.
const NEGATION_PREFIX: char = '-';

/// A `due` or `created` clause, kept unevaluated until conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateClause {
    /// The comparison.
    pub operator: DateOperator,
    /// The raw date expression.
    pub value: String,
}

impl DateClause {
    /// Creates a clause.
    pub fn new(operator: DateOperator, value: impl Into<String>) -> Self {
        Self {
            operator,
            value: value.into(),
        }
    }

    /// Evaluates the clause against `now`.
    ///
    /// # Errors
    ///
    /// Returns a date error if the value is not a valid expression or range.
    pub fn evaluate_at(&self, now: DateTime<Utc>) -> QueryResult<DateFilter> {
        parse_date_range_at(&self.value, self.operator, now)
    }
}

impl fmt::Display for DateClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.value)
    }
}

/// The validated, unresolved form of a query.
///
/// Produced by [`QueryParser::parse`] and consumed by
/// [`convert_to_task_filter`](crate::convert_to_task_filter).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    /// Status constraint.
    pub status: FieldFilter<TaskStatus>,
    /// Priority constraint.
    pub priority: FieldFilter<Priority>,
    /// Tags to include, in order.
    pub tags: Vec<String>,
    /// Tags to exclude, in order.
    pub exclude_tags: Vec<String>,
    /// Project named by a `project:` clause.
    pub project: Option<String>,
    /// `@name` / `@~name` mentions, in order.
    pub project_mentions: Vec<ProjectMention>,
    /// Due date clause.
    pub due: Option<DateClause>,
    /// Creation date clause.
    pub created: Option<DateClause>,
    /// Remaining words joined by single spaces.
    pub search_query: String,
}

impl ParsedQuery {
    /// Returns true if the query constrains nothing.
    pub fn is_empty(&self) -> bool {
        self.status.is_unset()
            && self.priority.is_unset()
            && self.tags.is_empty()
            && self.exclude_tags.is_empty()
            && self.project.is_none()
            && self.project_mentions.is_empty()
            && self.due.is_none()
            && self.created.is_none()
            && self.search_query.is_empty()
    }
}

/// Renders the query in canonical form, clause order fixed.
impl fmt::Display for ParsedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();

        match self.status {
            FieldFilter::Unset => {}
            FieldFilter::Equals(s) => parts.push(format!("status:{s}")),
            FieldFilter::NotEquals(s) => parts.push(format!("-status:{s}")),
        }
        match self.priority {
            FieldFilter::Unset => {}
            FieldFilter::Equals(p) => parts.push(format!("priority:{p}")),
            FieldFilter::NotEquals(p) => parts.push(format!("-priority:{p}")),
        }
        if let Some(project) = &self.project {
            parts.push(format!("project:{project}"));
        }
        parts.extend(self.project_mentions.iter().map(ToString::to_string));
        parts.extend(self.tags.iter().map(|t| format!("tag:{t}")));
        parts.extend(self.exclude_tags.iter().map(|t| format!("-tag:{t}")));
        if let Some(due) = &self.due {
            parts.push(format!("due{due}"));
        }
        if let Some(created) = &self.created {
            parts.push(format!("created{created}"));
        }
        if !self.search_query.is_empty() {
            parts.push(self.search_query.clone());
        }

        f.write_str(&parts.join(" "))
    }
}

/// Fields recognized in `field:value` clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Status,
    Priority,
    Tag,
    Project,
    Due,
    Created,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "status" => Some(Field::Status),
            "priority" => Some(Field::Priority),
            "tag" => Some(Field::Tag),
            "project" => Some(Field::Project),
            "due" => Some(Field::Due),
            "created" => Some(Field::Created),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Field::Status => "status",
            Field::Priority => "priority",
            Field::Tag => "tag",
            Field::Project => "project",
            Field::Due => "due",
            Field::Created => "created",
        }
    }

    fn is_date(self) -> bool {
        matches!(self, Field::Due | Field::Created)
    }

    fn can_negate(self) -> bool {
        matches!(self, Field::Status | Field::Priority | Field::Tag)
    }
}

/// A token split into its clause parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Clause<'a> {
    negated: bool,
    field: Field,
    operator: DateOperator,
    value: &'a str,
}

impl<'a> Clause<'a> {
    /// Splits `token` into a clause, or returns `None` for free text.
    ///
    /// Non-date fields only take `:`; `status<x` is free text.
    fn split(token: &'a str) -> Option<Self> {
        let (negated, body) = match token.strip_prefix(NEGATION_PREFIX) {
            Some(rest) if !rest.is_empty() => (true, rest),
            _ => (false, token),
        };

        let pos = body.find([':', '<', '>'])?;
        let field = Field::from_name(&body[..pos])?;
        let mut operator = DateOperator::from_char(body[pos..].chars().next()?)?;
        let mut value = &body[pos + 1..];

        if field.is_date() {
            // `due:<x` and `due:>x` read as `due<x` and `due>x`.
            if operator == DateOperator::On {
                if let Some(op) = value.chars().next().and_then(DateOperator::from_char) {
                    if op != DateOperator::On {
                        operator = op;
                        value = &value[1..];
                    }
                }
            }
        } else if operator != DateOperator::On {
            return None;
        }

        Some(Self {
            negated,
            field,
            operator,
            value,
        })
    }
}

/// Parser for query expressions.
///
/// # Example
///
/// ```
/// use taskq_core::filter::FieldFilter;
/// use taskq_core::models::Priority;
/// use taskq_query::QueryParser;
///
/// let parsed = QueryParser::parse("priority:HIGH tag:bug -tag:wontfix login").unwrap();
/// assert_eq!(parsed.priority, FieldFilter::Equals(Priority::High));
/// assert_eq!(parsed.tags, vec!["bug"]);
/// assert_eq!(parsed.exclude_tags, vec!["wontfix"]);
/// assert_eq!(parsed.search_query, "login");
/// ```
pub struct QueryParser {
    parsed: ParsedQuery,
    words: Vec<String>,
}

impl QueryParser {
    /// Parses a query expression.
    ///
    /// Date clauses are checked for syntax here without reading the clock,
    /// and evaluated only at conversion time. A range whose start falls
    /// after its end is therefore reported by conversion.
    ///
    /// # Errors
    ///
    /// Returns the first syntax error encountered; no partial result is
    /// produced.
    pub fn parse(input: &str) -> QueryResult<ParsedQuery> {
        let mentions = parse_project_mentions(input)?;

        let mut parser = Self {
            parsed: ParsedQuery {
                project_mentions: mentions.project_mentions,
                ..Default::default()
            },
            words: Vec::new(),
        };

        for token in tokenize(&mentions.base_query) {
            parser.consume(token)?;
        }

        parser.parsed.search_query = parser.words.join(" ");
        debug!(query = %parser.parsed, "parsed query");
        Ok(parser.parsed)
    }

    fn consume(&mut self, token: &str) -> QueryResult<()> {
        let Some(clause) = Clause::split(token) else {
            self.words.push(token.to_string());
            return Ok(());
        };

        let field = clause.field;
        if clause.negated && !field.can_negate() {
            return Err(QueryError::UnsupportedNegation {
                field: field.name().to_string(),
            });
        }
        if clause.value.is_empty() {
            return Err(QueryError::missing_value(field.name()));
        }

        match field {
            Field::Status => {
                let status: TaskStatus = clause.value.parse()?;
                self.parsed.status = negatable(status, clause.negated);
            }
            Field::Priority => {
                let priority: Priority = clause.value.parse()?;
                self.parsed.priority = negatable(priority, clause.negated);
            }
            Field::Tag if clause.negated => self.parsed.exclude_tags.push(clause.value.to_string()),
            Field::Tag => self.parsed.tags.push(clause.value.to_string()),
            Field::Project => self.parsed.project = Some(clause.value.to_string()),
            Field::Due | Field::Created => {
                validate_date_range(clause.value, clause.operator)?;
                let date_clause = DateClause::new(clause.operator, clause.value);
                if field == Field::Due {
                    self.parsed.due = Some(date_clause);
                } else {
                    self.parsed.created = Some(date_clause);
                }
            }
        }
        Ok(())
    }
}

fn negatable<T>(value: T, negated: bool) -> FieldFilter<T> {
    if negated {
        FieldFilter::NotEquals(value)
    } else {
        FieldFilter::Equals(value)
    }
}

/// Parses a query expression. See [`QueryParser::parse`].
///
/// # Errors
///
/// Returns the first syntax error encountered.
pub fn parse_query(input: &str) -> QueryResult<ParsedQuery> {
    QueryParser::parse(input)
}
