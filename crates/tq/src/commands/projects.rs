//! Projects command implementation.
//!
//! Lists the projects that query references resolve against.

use taskq_core::models::Project;
use taskq_query::FuzzyMatcher;

use super::config::Config;
use super::{CommandContext, Result};
use crate::output::{format_projects_json, format_projects_table, RankedProject};

/// Options for the projects list command.
#[derive(Debug, Default)]
pub struct ProjectsListOptions {
    /// Rank by fuzzy match against this term.
    pub search: Option<String>,
    /// Include archived projects.
    pub archived: bool,
}

/// Executes the projects list command.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn execute(ctx: &CommandContext, config: &Config, opts: &ProjectsListOptions) -> Result<()> {
    let catalog = ctx.load_catalog(config).await?;
    let visible = filter_projects(catalog.projects(), opts);

    let rows: Vec<RankedProject> = match &opts.search {
        Some(term) => FuzzyMatcher::new(config.fuzzy_threshold())
            .rank(term, &visible, |p: &&Project| p.name.as_str())
            .into_iter()
            .map(|(project, score)| RankedProject {
                project: *project,
                score: Some(score),
            })
            .collect(),
        None => visible
            .iter()
            .map(|project| RankedProject {
                project: *project,
                score: None,
            })
            .collect(),
    };

    if ctx.json_output {
        println!("{}", format_projects_json(&rows)?);
    } else if !ctx.quiet {
        print!(
            "{}",
            format_projects_table(&rows, catalog.projects(), ctx.use_colors)
        );
    }

    Ok(())
}

/// Filters projects based on the provided options.
fn filter_projects<'a>(projects: &'a [Project], opts: &ProjectsListOptions) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|p| opts.archived || !p.archived)
        .collect()
}
