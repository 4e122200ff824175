//! Conversion of a parsed query into a [`TaskFilter`].
//!
//! This is the only stage that touches storage: project references are
//! resolved through the read-only [`ProjectLookup`] held by the
//! [`ConverterContext`]. Date clauses are evaluated here too, all against one
//! instant.

use chrono::{DateTime, Utc};
use taskq_core::filter::{DateFilter, TaskFilter};
use taskq_core::models::Project;
use taskq_core::ProjectLookup;
use tracing::debug;

use crate::error::{QueryError, QueryResult};
use crate::fuzzy::FuzzyMatcher;
use crate::parser::{DateClause, ParsedQuery};

/// Maximum number of search results considered for a fuzzy mention.
pub const FUZZY_CANDIDATE_LIMIT: usize = 50;

/// Everything the converter needs besides the parsed query.
#[derive(Debug)]
pub struct ConverterContext<'a, L> {
    lookup: &'a L,
    now: Option<DateTime<Utc>>,
    matcher: FuzzyMatcher,
}

impl<'a, L: ProjectLookup> ConverterContext<'a, L> {
    /// Creates a context that reads the clock at conversion time and uses the
    /// default fuzzy threshold.
    pub fn new(lookup: &'a L) -> Self {
        Self {
            lookup,
            now: None,
            matcher: FuzzyMatcher::default(),
        }
    }

    /// Pins the instant that date keywords and offsets are evaluated against.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Sets the minimum fuzzy score for `@~name` mentions.
    pub fn with_fuzzy_threshold(mut self, threshold: u8) -> Self {
        self.matcher = FuzzyMatcher::new(threshold);
        self
    }

    /// Returns the project lookup.
    pub fn lookup(&self) -> &L {
        self.lookup
    }
}

/// Converts a parsed query into a storage-ready filter.
///
/// References are resolved in order: the `project:` clause first, then each
/// mention. All of them must name the same project.
///
/// # Errors
///
/// - `QueryError::ProjectNotFound` when an exact reference has no match.
/// - `QueryError::NoFuzzyMatch` when no project scores above the threshold.
/// - `QueryError::ConflictingProjects` when references disagree.
/// - Date errors when a clause no longer evaluates.
/// - `QueryError::Lookup` when the lookup itself fails.
///
/// On error no filter is returned.
pub async fn convert_to_task_filter<L: ProjectLookup>(
    parsed: &ParsedQuery,
    ctx: &ConverterContext<'_, L>,
) -> QueryResult<TaskFilter> {
    let now = ctx.now.unwrap_or_else(Utc::now);

    let due = evaluate(parsed.due.as_ref(), now)?;
    let created = evaluate(parsed.created.as_ref(), now)?;
    let project_id = resolve_project_id(parsed, ctx).await?;

    let filter = TaskFilter {
        status: parsed.status,
        priority: parsed.priority,
        project_id,
        tags: parsed.tags.clone(),
        exclude_tags: parsed.exclude_tags.clone(),
        due,
        created,
        search_query: parsed.search_query.clone(),
        ..Default::default()
    };
    debug!(?filter, "converted query");
    Ok(filter)
}

fn evaluate(clause: Option<&DateClause>, now: DateTime<Utc>) -> QueryResult<DateFilter> {
    match clause {
        Some(clause) => clause.evaluate_at(now),
        None => Ok(DateFilter::NoFilter),
    }
}

async fn resolve_project_id<L: ProjectLookup>(
    parsed: &ParsedQuery,
    ctx: &ConverterContext<'_, L>,
) -> QueryResult<Option<i64>> {
    let mut resolved: Option<(String, i64)> = None;

    if let Some(name) = &parsed.project {
        let project = resolve_by_name_or_alias(ctx.lookup, name).await?;
        agree(&mut resolved, format!("project:{name}"), project.id)?;
    }

    for mention in &parsed.project_mentions {
        let project = if mention.fuzzy {
            resolve_fuzzy(ctx, &mention.name).await?
        } else {
            resolve_exact(ctx.lookup, &mention.name).await?
        };
        agree(&mut resolved, mention.to_string(), project.id)?;
    }

    Ok(resolved.map(|(_, id)| id))
}

/// Records a resolved reference, failing if an earlier one named another project.
fn agree(resolved: &mut Option<(String, i64)>, reference: String, id: i64) -> QueryResult<()> {
    match resolved.as_ref() {
        Some((first, existing)) if *existing != id => Err(QueryError::ConflictingProjects {
            first: first.clone(),
            second: reference,
        }),
        Some(_) => Ok(()),
        None => {
            *resolved = Some((reference, id));
            Ok(())
        }
    }
}

/// `@name`: exact, case-sensitive name.
async fn resolve_exact<L: ProjectLookup>(lookup: &L, name: &str) -> QueryResult<Project> {
    let project = lookup
        .get_by_name(name)
        .await?
        .ok_or_else(|| QueryError::project_not_found(name))?;
    debug!(name, id = project.id, "resolved exact project mention");
    Ok(project)
}

/// `project:name`: exact name, then alias (case-insensitive).
async fn resolve_by_name_or_alias<L: ProjectLookup>(lookup: &L, name: &str) -> QueryResult<Project> {
    if let Some(project) = lookup.get_by_name(name).await? {
        debug!(name, id = project.id, "resolved project by name");
        return Ok(project);
    }
    let project = lookup
        .get_by_alias(name)
        .await?
        .ok_or_else(|| QueryError::project_not_found(name))?;
    debug!(alias = name, id = project.id, "resolved project by alias");
    Ok(project)
}

/// `@~name`: best fuzzy match among the search results together with every
/// active project.
///
/// Search hits come first, then the remaining active projects in listing
/// order, so ties go to a search hit. Archived projects never match.
async fn resolve_fuzzy<L: ProjectLookup>(
    ctx: &ConverterContext<'_, L>,
    term: &str,
) -> QueryResult<Project> {
    let mut candidates = ctx.lookup.search(term, FUZZY_CANDIDATE_LIMIT).await?;
    candidates.retain(|p| !p.archived);

    for project in ctx.lookup.list_active().await? {
        if !candidates.iter().any(|c| c.id == project.id) {
            candidates.push(project);
        }
    }

    pick(&ctx.matcher, term, &candidates).ok_or_else(|| QueryError::NoFuzzyMatch {
        term: term.to_string(),
        threshold: ctx.matcher.threshold(),
    })
}

fn pick(matcher: &FuzzyMatcher, term: &str, candidates: &[Project]) -> Option<Project> {
    let (project, score) = matcher.best_match(term, candidates, |p: &Project| p.name.as_str())?;
    debug!(term, name = %project.name, id = project.id, score, "resolved fuzzy project mention");
    Some(project.clone())
}
