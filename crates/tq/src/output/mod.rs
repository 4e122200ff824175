//! Output formatting utilities for the tq CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by entity type:
//!
//! - [`query`] - Parsed query and resolved filter output
//! - [`projects`] - Project list output
//! - [`helpers`] - Common formatting utilities (truncation, enums, dates)

pub mod helpers;
mod projects;
mod query;

pub use projects::{format_projects_json, format_projects_table, RankedProject};
pub use query::{format_filter_json, format_filter_table, format_parsed_json, format_parsed_table};
