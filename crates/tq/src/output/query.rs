//! Query output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;
use taskq_core::filter::TaskFilter;
use taskq_core::models::Project;
use taskq_query::ParsedQuery;

use super::helpers::{
    format_date_filter, format_field_filter, format_priority, format_status, format_tags,
    truncate_str,
};

/// Width of the label column in table output.
const LABEL_WIDTH: usize = 10;

/// Longest free-text search shown in table output.
const MAX_SEARCH_LEN: usize = 60;

/// JSON output structure for a parsed query.
#[derive(Serialize)]
pub struct ParsedQueryOutput<'a> {
    pub canonical: String,
    pub parsed: &'a ParsedQuery,
}

/// Formats a parsed query as JSON.
pub fn format_parsed_json(parsed: &ParsedQuery) -> Result<String, serde_json::Error> {
    let output = ParsedQueryOutput {
        canonical: parsed.to_string(),
        parsed,
    };
    serde_json::to_string_pretty(&output)
}

/// Formats a parsed query for humans.
pub fn format_parsed_table(parsed: &ParsedQuery, use_colors: bool) -> String {
    let mut rows: Vec<(&str, String)> = Vec::new();

    if let Some(s) = format_field_filter(&parsed.status, |s| format_status(s, use_colors)) {
        rows.push(("status", s));
    }
    if let Some(p) = format_field_filter(&parsed.priority, |p| format_priority(p, use_colors)) {
        rows.push(("priority", p));
    }
    if let Some(project) = &parsed.project {
        rows.push(("project", project.clone()));
    }
    if !parsed.project_mentions.is_empty() {
        let mentions: Vec<String> = parsed
            .project_mentions
            .iter()
            .map(ToString::to_string)
            .collect();
        rows.push(("mentions", mentions.join(" ")));
    }
    push_tags(&mut rows, &parsed.tags, &parsed.exclude_tags);
    if let Some(due) = &parsed.due {
        rows.push(("due", due.to_string()));
    }
    if let Some(created) = &parsed.created {
        rows.push(("created", created.to_string()));
    }
    if !parsed.search_query.is_empty() {
        rows.push(("search", quoted(&parsed.search_query)));
    }

    render("Parsed query", &parsed.to_string(), rows, use_colors)
}

/// JSON output structure for a resolved filter.
#[derive(Serialize)]
pub struct FilterOutput<'a> {
    pub query: &'a str,
    pub filter: &'a TaskFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<&'a Project>,
    pub due_bounds: Bounds,
    pub created_bounds: Bounds,
}

/// Storage bounds of a date filter.
#[derive(Serialize)]
pub struct Bounds {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl Bounds {
    fn of(filter: &taskq_core::filter::DateFilter) -> Self {
        let (from, to) = filter.sql_bounds();
        Self { from, to }
    }
}

/// Formats a resolved filter as JSON.
pub fn format_filter_json(
    query: &str,
    filter: &TaskFilter,
    project: Option<&Project>,
) -> Result<String, serde_json::Error> {
    let output = FilterOutput {
        query,
        filter,
        project,
        due_bounds: Bounds::of(&filter.due),
        created_bounds: Bounds::of(&filter.created),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats a resolved filter for humans.
pub fn format_filter_table(
    query: &str,
    filter: &TaskFilter,
    project: Option<&Project>,
    use_colors: bool,
) -> String {
    let mut rows: Vec<(&str, String)> = Vec::new();

    if let Some(s) = format_field_filter(&filter.status, |s| format_status(s, use_colors)) {
        rows.push(("status", s));
    }
    if let Some(p) = format_field_filter(&filter.priority, |p| format_priority(p, use_colors)) {
        rows.push(("priority", p));
    }
    match (filter.project_id, project) {
        (Some(_), Some(project)) => {
            rows.push(("project", format!("{} (#{})", project.name, project.id)));
        }
        (Some(id), None) => rows.push(("project", format!("#{id}"))),
        (None, _) => {}
    }
    push_tags(&mut rows, &filter.tags, &filter.exclude_tags);
    if let Some(due) = format_date_filter(&filter.due) {
        rows.push(("due", due));
    }
    if let Some(created) = format_date_filter(&filter.created) {
        rows.push(("created", created));
    }
    if !filter.search_query.is_empty() {
        rows.push(("search", quoted(&filter.search_query)));
    }

    render("Task filter", query, rows, use_colors)
}

fn push_tags<'a>(rows: &mut Vec<(&'a str, String)>, tags: &[String], exclude: &[String]) {
    if !tags.is_empty() {
        rows.push(("tags", format_tags(tags, "#")));
    }
    if !exclude.is_empty() {
        rows.push(("not tags", format_tags(exclude, "#")));
    }
}

fn quoted(text: &str) -> String {
    format!("\"{}\"", truncate_str(text, MAX_SEARCH_LEN))
}

fn render(title: &str, query: &str, rows: Vec<(&str, String)>, use_colors: bool) -> String {
    let mut output = String::new();

    if use_colors {
        output.push_str(&format!("{}: {}\n", title.green().bold(), query));
    } else {
        output.push_str(&format!("{title}: {query}\n"));
    }

    if rows.is_empty() {
        output.push_str("  (matches every task)\n");
        return output;
    }

    for (label, value) in rows {
        let label = format!("{:<width$}", label, width = LABEL_WIDTH);
        if use_colors {
            output.push_str(&format!("  {} {}\n", label.dimmed(), value));
        } else {
            output.push_str(&format!("  {label} {value}\n"));
        }
    }
    output
}
