//! Date expression evaluation.
//!
//! Date clauses accept a small fixed vocabulary:
//!
//! - absolute dates: `2025-01-15`, `2025/01/15` (UTC midnight)
//! - keywords: `today`, `tomorrow`, `yesterday`, `none`
//! - offsets from today: `7d`, `+2w`, `-1M` (days, weeks, calendar months)
//!
//! Keywords and offsets depend on the current instant. Every function that
//! reads the clock has an `_at` variant taking `now` explicitly so a caller can
//! evaluate several clauses against the same instant.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use taskq_core::filter::{DateFilter, SQL_DATETIME_FORMAT};

use crate::error::{QueryError, QueryResult};

/// Display format for dates.
pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Separator between the two ends of a range.
const RANGE_SEPARATOR: &str = "..";

/// Formats accepted for absolute dates.
const ABSOLUTE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Keyword meaning "has no date".
const NONE_KEYWORD: &str = "none";

/// Comparison used by a date clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateOperator {
    /// `:` - on the day (or within the range).
    #[serde(rename = ":")]
    On,
    /// `<` - on or before the day.
    #[serde(rename = "<")]
    Before,
    /// `>` - on or after the day.
    #[serde(rename = ">")]
    After,
}

impl DateOperator {
    /// Returns the operator symbol.
    pub fn as_str(self) -> &'static str {
        match self {
            DateOperator::On => ":",
            DateOperator::Before => "<",
            DateOperator::After => ">",
        }
    }

    /// Maps an operator character to its operator.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ':' => Some(DateOperator::On),
            '<' => Some(DateOperator::Before),
            '>' => Some(DateOperator::After),
            _ => None,
        }
    }
}

impl fmt::Display for DateOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateOperator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next().and_then(Self::from_char), chars.next()) {
            (Some(op), None) => Ok(op),
            _ => Err(QueryError::invalid_date(s)),
        }
    }
}

/// Result of evaluating a single date expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    /// A concrete instant (always the start of a day).
    At(DateTime<Utc>),
    /// The `none` keyword: the absence of a date.
    None,
}

impl DateValue {
    /// Returns the instant, if any.
    pub fn instant(self) -> Option<DateTime<Utc>> {
        match self {
            DateValue::At(instant) => Some(instant),
            DateValue::None => None,
        }
    }

    /// Returns `Some("none")` for the `none` keyword.
    pub fn special(self) -> Option<&'static str> {
        match self {
            DateValue::At(_) => None,
            DateValue::None => Some(NONE_KEYWORD),
        }
    }

    /// Returns true for the `none` keyword.
    pub fn is_none(self) -> bool {
        matches!(self, DateValue::None)
    }
}

/// Evaluates a date expression against the current instant.
///
/// # Errors
///
/// Returns `QueryError::InvalidDate` if the expression is not in the
/// vocabulary.
pub fn parse_date(input: &str) -> QueryResult<DateValue> {
    parse_date_at(input, Utc::now())
}

/// Evaluates a date expression against `now`.
///
/// # Errors
///
/// Returns `QueryError::InvalidDate` if the expression is not in the
/// vocabulary.
pub fn parse_date_at(input: &str, now: DateTime<Utc>) -> QueryResult<DateValue> {
    let trimmed = input.trim();
    let today = now.date_naive();

    let date = match trimmed.to_lowercase().as_str() {
        NONE_KEYWORD => return Ok(DateValue::None),
        "today" => Some(today),
        "tomorrow" => today.checked_add_days(Days::new(1)),
        "yesterday" => today.checked_sub_days(Days::new(1)),
        _ => match parse_offset(trimmed) {
            Some(offset) => offset.apply(today),
            None => parse_absolute(trimmed),
        },
    };

    date.map(|d| DateValue::At(start_of_day(d)))
        .ok_or_else(|| QueryError::invalid_date(input))
}

/// Evaluates a clause value with its operator into date bounds, against the
/// current instant.
///
/// # Errors
///
/// Returns `QueryError::InvalidDate` for an unknown expression and
/// `QueryError::InvalidDateRange` for a malformed `A..B` range.
pub fn parse_date_range(value: &str, operator: DateOperator) -> QueryResult<DateFilter> {
    parse_date_range_at(value, operator, Utc::now())
}

/// Evaluates a clause value with its operator into date bounds, against `now`.
///
/// - `:` with a single date covers that whole day.
/// - `:` with `A..B` runs from the start of `A` to the end of `B`; either end
///   may be omitted for an open range.
/// - `<` is "on or before", `>` is "on or after".
/// - `none` yields [`DateFilter::MustBeNull`] whatever the operator.
///
/// # Errors
///
/// Returns `QueryError::InvalidDate` for an unknown expression and
/// `QueryError::InvalidDateRange` for a malformed `A..B` range.
pub fn parse_date_range_at(
    value: &str,
    operator: DateOperator,
    now: DateTime<Utc>,
) -> QueryResult<DateFilter> {
    if let Some((start, end)) = split_range(value, operator)? {
        return parse_range_bounds(value, start, end, now);
    }

    let date = match parse_date_at(value, now)? {
        DateValue::None => return Ok(DateFilter::MustBeNull),
        DateValue::At(instant) => instant.date_naive(),
    };

    let (from, to) = match operator {
        DateOperator::On => (Some(start_of_day(date)), Some(end_of_day(date))),
        DateOperator::Before => (None, Some(end_of_day(date))),
        DateOperator::After => (Some(start_of_day(date)), None),
    };
    Ok(DateFilter::Range { from, to })
}

/// Checks the syntax of a clause value without consulting the clock.
///
/// Every bound must be a keyword, an offset or an absolute date. Offsets are
/// applied to a fixed reference day so that overflow is still caught. The
/// order of the two bounds of a range depends on the evaluation instant and
/// is only checked by [`parse_date_range_at`].
///
/// # Errors
///
/// Returns the same errors as [`parse_date_range_at`] except "start is after
/// end".
pub fn validate_date_range(value: &str, operator: DateOperator) -> QueryResult<()> {
    let reference = DateTime::<Utc>::default();
    match split_range(value, operator)? {
        Some((start, end)) => {
            range_bound(value, start, reference)?;
            range_bound(value, end, reference)?;
        }
        None => {
            parse_date_at(value, reference)?;
        }
    }
    Ok(())
}

/// Splits `A..B`, rejecting ranges under `<`/`>` and ranges with no ends.
fn split_range(value: &str, operator: DateOperator) -> QueryResult<Option<(&str, &str)>> {
    let Some((start, end)) = value.split_once(RANGE_SEPARATOR) else {
        return Ok(None);
    };
    if operator != DateOperator::On {
        return Err(QueryError::invalid_range(
            value,
            format!("ranges only work with ':', not '{operator}'"),
        ));
    }
    if start.is_empty() && end.is_empty() {
        return Err(QueryError::invalid_range(value, "both ends are empty"));
    }
    Ok(Some((start, end)))
}

/// Evaluates one end of a range; an empty end is open.
fn range_bound(value: &str, part: &str, now: DateTime<Utc>) -> QueryResult<Option<NaiveDate>> {
    if part.is_empty() {
        return Ok(None);
    }
    match parse_date_at(part, now)? {
        DateValue::At(instant) => Ok(Some(instant.date_naive())),
        DateValue::None => Err(QueryError::invalid_range(
            value,
            "'none' cannot be a range bound",
        )),
    }
}

fn parse_range_bounds(
    value: &str,
    start: &str,
    end: &str,
    now: DateTime<Utc>,
) -> QueryResult<DateFilter> {
    let from = range_bound(value, start, now)?;
    let to = range_bound(value, end, now)?;

    if let (Some(f), Some(t)) = (from, to) {
        if f > t {
            return Err(QueryError::invalid_range(value, "start is after end"));
        }
    }

    Ok(DateFilter::Range {
        from: from.map(start_of_day),
        to: to.map(end_of_day),
    })
}

/// Returns midnight UTC of `date`.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Returns 23:59:59 UTC of `date`.
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    date.and_time(last_second).and_utc()
}

/// Formats an instant as `YYYY-MM-DD HH:MM:SS` for storage.
pub fn format_sql_datetime(instant: DateTime<Utc>) -> String {
    instant.format(SQL_DATETIME_FORMAT).to_string()
}

/// Formats an instant as `YYYY-MM-DD` for display.
pub fn format_display_date(instant: DateTime<Utc>) -> String {
    instant.format(DISPLAY_DATE_FORMAT).to_string()
}

/// A signed offset in days, weeks or calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Offset {
    negative: bool,
    amount: u32,
    unit: OffsetUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OffsetUnit {
    Days,
    Weeks,
    Months,
}

impl Offset {
    fn apply(self, date: NaiveDate) -> Option<NaiveDate> {
        match self.unit {
            OffsetUnit::Days => shift_days(date, u64::from(self.amount), self.negative),
            OffsetUnit::Weeks => shift_days(date, u64::from(self.amount) * 7, self.negative),
            OffsetUnit::Months => {
                let months = Months::new(self.amount);
                if self.negative {
                    date.checked_sub_months(months)
                } else {
                    date.checked_add_months(months)
                }
            }
        }
    }
}

fn shift_days(date: NaiveDate, days: u64, negative: bool) -> Option<NaiveDate> {
    if negative {
        date.checked_sub_days(Days::new(days))
    } else {
        date.checked_add_days(Days::new(days))
    }
}

/// Parses `[+|-]N(d|w|M)`. The unit is case-sensitive: `M` is months.
fn parse_offset(input: &str) -> Option<Offset> {
    let (negative, rest) = match input.as_bytes().first()? {
        b'+' => (false, &input[1..]),
        b'-' => (true, &input[1..]),
        _ => (false, input),
    };

    let unit = match rest.chars().last()? {
        'd' => OffsetUnit::Days,
        'w' => OffsetUnit::Weeks,
        'M' => OffsetUnit::Months,
        _ => return None,
    };

    let digits = &rest[..rest.len() - 1];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(Offset {
        negative,
        amount: digits.parse().ok()?,
        unit,
    })
}

fn parse_absolute(input: &str) -> Option<NaiveDate> {
    ABSOLUTE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
}
