//! Query language for taskq.
//!
//! Turns a single free-text expression such as
//! `status:pending priority:high @backend tag:bug -tag:wontfix due:<2025-12-31`
//! into a storage-ready [`TaskFilter`](taskq_core::filter::TaskFilter).
//!
//! The pipeline has two stages:
//!
//! 1. [`parse_query`] tokenizes the input, extracts `@name` / `@~name` project
//!    mentions and validates `field:value` clauses into a [`ParsedQuery`].
//!    Parsing is pure: nothing is looked up and "now" is not evaluated.
//! 2. [`convert_to_task_filter`] resolves project references through a
//!    [`ProjectLookup`](taskq_core::ProjectLookup), evaluates date clauses
//!    against a single instant and produces the filter.
//!
//! Every clause is ANDed with the others. The first invalid clause or
//! unresolvable reference aborts the whole pipeline.
//!
//! # Supported Syntax
//!
//! - `status:V`, `-status:V` - `pending`, `in_progress`, `completed`, `cancelled`
//! - `priority:V`, `-priority:V` - `low`, `medium`, `high`, `urgent`
//! - `tag:V`, `-tag:V` - include or exclude a tag
//! - `project:V` - project by name or alias
//! - `@name`, `@~name` - project by exact or fuzzy name
//! - `due:V`, `due<V`, `due>V`, `due:A..B` (same for `created`), where a date is
//!   `YYYY-MM-DD`, `YYYY/MM/DD`, `today`, `tomorrow`, `yesterday`, `none` or
//!   an offset such as `+3d`, `-2w`, `1M`
//! - anything else is free-text search
//!
//! # Example
//!
//! ```
//! use taskq_core::models::{Project, TaskStatus};
//! use taskq_core::filter::FieldFilter;
//! use taskq_core::ProjectCatalog;
//! use taskq_query::{convert_to_task_filter, parse_query, ConverterContext};
//!
//! # tokio_test_block(async {
//! let catalog = ProjectCatalog::new(vec![Project::new(1, "backend")]);
//! let parsed = parse_query("status:pending @backend flaky test").unwrap();
//! let filter = convert_to_task_filter(&parsed, &ConverterContext::new(&catalog))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(filter.status, FieldFilter::Equals(TaskStatus::Pending));
//! assert_eq!(filter.project_id, Some(1));
//! assert_eq!(filter.search_query, "flaky test");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod convert;
pub mod date;
mod error;
pub mod fuzzy;
pub mod mention;
pub mod parser;

pub use convert::{convert_to_task_filter, ConverterContext};
pub use date::{parse_date, parse_date_range, DateOperator, DateValue};
pub use error::{QueryError, QueryResult};
pub use fuzzy::{FuzzyMatcher, MIN_FUZZY_SCORE};
pub use mention::{parse_project_mentions, ProjectMention, ProjectMentionQuery};
pub use parser::{parse_query, DateClause, ParsedQuery, QueryParser};
