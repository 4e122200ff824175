//! Project output formatting.

use std::collections::HashMap;

use owo_colors::OwoColorize;
use serde::Serialize;
use taskq_core::models::Project;

use super::helpers::truncate_str;

/// Longest project name shown in table output.
const MAX_NAME_LEN: usize = 25;

/// A project to list, with its fuzzy score when ranked.
#[derive(Debug, Clone, Copy)]
pub struct RankedProject<'a> {
    pub project: &'a Project,
    pub score: Option<u8>,
}

/// JSON output structure for projects list command.
#[derive(Serialize)]
pub struct ProjectsListOutput<'a> {
    pub projects: Vec<ProjectOutput<'a>>,
}

/// JSON output structure for a single project.
#[derive(Serialize)]
pub struct ProjectOutput<'a> {
    pub id: i64,
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    pub is_archived: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

/// Formats projects as JSON.
pub fn format_projects_json(projects: &[RankedProject]) -> Result<String, serde_json::Error> {
    let projects_output: Vec<ProjectOutput> = projects
        .iter()
        .map(|r| ProjectOutput {
            id: r.project.id,
            name: &r.project.name,
            alias: r.project.alias.as_deref(),
            parent_id: r.project.parent_id,
            is_archived: r.project.archived,
            score: r.score,
        })
        .collect();

    serde_json::to_string_pretty(&ProjectsListOutput {
        projects: projects_output,
    })
}

/// Formats projects as a table.
///
/// `all` is the full catalog, used to name parents that are not listed.
pub fn format_projects_table(
    projects: &[RankedProject],
    all: &[Project],
    use_colors: bool,
) -> String {
    if projects.is_empty() {
        return "No projects found.\n".to_string();
    }

    let names: HashMap<i64, &str> = all.iter().map(|p| (p.id, p.name.as_str())).collect();
    let ranked = projects.iter().any(|r| r.score.is_some());

    let mut output = String::new();

    let header = if ranked {
        format!("{:<6} {:<5} {:<25} {:<10} {}", "ID", "Score", "Name", "Alias", "Parent")
    } else {
        format!("{:<6} {:<25} {:<10} {}", "ID", "Name", "Alias", "Parent")
    };
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for r in projects {
        let project = r.project;
        let name = format_project_name(project, use_colors);
        let alias = project.alias.as_deref().unwrap_or("");
        let parent = project
            .parent_id
            .map(|id| names.get(&id).map_or_else(|| format!("#{id}"), |n| n.to_string()))
            .unwrap_or_default();

        let line = match r.score {
            Some(score) if ranked => format!(
                "{:<6} {:<5} {:<25} {:<10} {}",
                project.id, score, name, alias, parent
            ),
            _ => format!("{:<6} {:<25} {:<10} {}", project.id, name, alias, parent),
        };
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}

/// Formats a project name, marking archived projects.
fn format_project_name(project: &Project, use_colors: bool) -> String {
    let name = truncate_str(&project.name, MAX_NAME_LEN);
    if project.archived {
        let label = format!("{name} [archived]");
        if use_colors {
            label.dimmed().to_string()
        } else {
            label
        }
    } else {
        name
    }
}
