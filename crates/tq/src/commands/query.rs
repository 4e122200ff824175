//! Query command implementation.
//!
//! Parses a query expression and, unless `--parse-only` is given, resolves it
//! against the project catalog into a task filter.

use taskq_core::ProjectCatalog;
use taskq_query::{convert_to_task_filter, parse_query, ConverterContext};
use tracing::debug;

use super::config::Config;
use super::{CommandContext, Result};
use crate::output::{format_filter_json, format_filter_table, format_parsed_json, format_parsed_table};

/// Options for the query command.
#[derive(Debug, Default)]
pub struct QueryOptions {
    /// The query expression.
    pub expr: String,
    /// Stop after parsing.
    pub parse_only: bool,
    /// Fuzzy threshold override.
    pub fuzzy_threshold: Option<u8>,
}

/// Executes the query command.
///
/// # Errors
///
/// Returns an error if the query fails to parse or resolve, or if the
/// catalog cannot be loaded.
pub async fn execute(ctx: &CommandContext, config: &Config, opts: &QueryOptions) -> Result<()> {
    let parsed = parse_query(&opts.expr)?;

    if opts.parse_only {
        if ctx.json_output {
            println!("{}", format_parsed_json(&parsed)?);
        } else if !ctx.quiet {
            print!("{}", format_parsed_table(&parsed, ctx.use_colors));
        }
        return Ok(());
    }

    let catalog = if references_projects(&parsed) {
        ctx.load_catalog(config).await?
    } else {
        ProjectCatalog::default()
    };

    let threshold = opts
        .fuzzy_threshold
        .unwrap_or_else(|| config.fuzzy_threshold());
    debug!(threshold, "converting query");
    let converter = ConverterContext::new(&catalog).with_fuzzy_threshold(threshold);
    let filter = convert_to_task_filter(&parsed, &converter).await?;

    let project = filter
        .project_id
        .and_then(|id| catalog.projects().iter().find(|p| p.id == id));

    if ctx.json_output {
        println!("{}", format_filter_json(&opts.expr, &filter, project)?);
    } else if !ctx.quiet {
        print!(
            "{}",
            format_filter_table(&opts.expr, &filter, project, ctx.use_colors)
        );
    }

    Ok(())
}

/// Returns true if resolving the query needs the catalog.
fn references_projects(parsed: &taskq_query::ParsedQuery) -> bool {
    parsed.project.is_some() || !parsed.project_mentions.is_empty()
}
