//! Read-only project lookup.
//!
//! The query converter resolves `@name`, `@~name` and `project:` references
//! through the [`ProjectLookup`] trait. The persistence layer supplies the real
//! implementation; [`ProjectCatalog`] is an in-memory one backed by a list of
//! projects, used by the CLI and by tests.

use thiserror::Error;

use crate::models::Project;

/// Errors surfaced by a [`ProjectLookup`] implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// The backing store could not be read.
    #[error("project store unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
}

impl LookupError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        LookupError::Unavailable {
            message: message.into(),
        }
    }
}

/// Result type for lookup operations.
pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// Read-only access to projects.
///
/// Calls may perform blocking or async storage I/O. Implementations must not
/// mutate any project or task data.
#[allow(async_fn_in_trait)]
pub trait ProjectLookup {
    /// Finds a project by its exact, case-sensitive name.
    async fn get_by_name(&self, name: &str) -> LookupResult<Option<Project>>;

    /// Finds a project by alias, ignoring case.
    async fn get_by_alias(&self, alias: &str) -> LookupResult<Option<Project>>;

    /// Returns up to `limit` projects whose name or alias contains `query`
    /// (case-insensitive), in listing order.
    async fn search(&self, query: &str, limit: usize) -> LookupResult<Vec<Project>>;

    /// Returns every non-archived project in listing order.
    async fn list_active(&self) -> LookupResult<Vec<Project>>;
}

/// In-memory [`ProjectLookup`] over a list of projects.
///
/// Listing order is the order of the vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectCatalog {
    projects: Vec<Project>,
}

impl ProjectCatalog {
    /// Creates a catalog from a list of projects.
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// Returns all projects, archived ones included.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Returns the number of projects.
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Returns true if the catalog holds no projects.
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl ProjectLookup for ProjectCatalog {
    async fn get_by_name(&self, name: &str) -> LookupResult<Option<Project>> {
        Ok(self.projects.iter().find(|p| p.name == name).cloned())
    }

    async fn get_by_alias(&self, alias: &str) -> LookupResult<Option<Project>> {
        Ok(self
            .projects
            .iter()
            .find(|p| p.alias_matches(alias))
            .cloned())
    }

    async fn search(&self, query: &str, limit: usize) -> LookupResult<Vec<Project>> {
        let needle = query.to_lowercase();
        Ok(self
            .projects
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.alias
                        .as_deref()
                        .is_some_and(|a| a.to_lowercase().contains(&needle))
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_active(&self) -> LookupResult<Vec<Project>> {
        Ok(self
            .projects
            .iter()
            .filter(|p| !p.archived)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ProjectCatalog {
        ProjectCatalog::new(vec![
            Project::new(1, "backend").with_alias("be"),
            Project::new(2, "backend-api"),
            Project::new(3, "Frontend").with_alias("FE"),
            Project::new(4, "legacy-backend").archived(),
        ])
    }

    #[tokio::test]
    async fn test_get_by_name_is_case_sensitive() {
        let catalog = catalog();
        let found = catalog.get_by_name("backend").await.unwrap();
        assert_eq!(found.map(|p| p.id), Some(1));

        assert!(catalog.get_by_name("Backend").await.unwrap().is_none());
        assert!(catalog.get_by_name("frontend").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_alias_ignores_case() {
        let catalog = catalog();
        let found = catalog.get_by_alias("fe").await.unwrap();
        assert_eq!(found.map(|p| p.id), Some(3));
        assert!(catalog.get_by_alias("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_respects_limit_and_order() {
        let catalog = catalog();
        let results = catalog.search("BACKEND", 10).await.unwrap();
        let ids: Vec<i64> = results.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);

        let limited = catalog.search("backend", 2).await.unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn test_search_matches_alias() {
        let catalog = catalog();
        let results = catalog.search("fe", 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Frontend");
    }

    #[tokio::test]
    async fn test_list_active_skips_archived() {
        let catalog = catalog();
        let active = catalog.list_active().await.unwrap();
        assert_eq!(active.len(), 3);
        assert!(active.iter().all(|p| !p.archived));
    }

    #[test]
    fn test_lookup_error_message() {
        let err = LookupError::unavailable("disk on fire");
        assert_eq!(err.to_string(), "project store unavailable: disk on fire");
    }
}
