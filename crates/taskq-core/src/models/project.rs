//! Project model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A project that tasks belong to.
///
/// Projects form a hierarchy through `parent_id`. The `alias` is a short
/// alternative handle that `project:` clauses may use instead of the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// The unique identifier for the project.
    pub id: i64,

    /// The display name (unique, case-sensitive).
    pub name: String,

    /// Optional short alias, matched case-insensitively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Parent project ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,

    /// Whether the project is archived.
    #[serde(default)]
    pub archived: bool,

    /// When the project was created.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Creates an active top-level project with the given ID and name.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            alias: None,
            description: None,
            parent_id: None,
            archived: false,
            created_at: Utc::now(),
        }
    }

    /// Sets the alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Sets the parent project.
    pub fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Marks the project as archived.
    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }

    /// Returns true if the alias matches, ignoring case.
    pub fn alias_matches(&self, alias: &str) -> bool {
        self.alias
            .as_deref()
            .is_some_and(|a| a.eq_ignore_ascii_case(alias))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_helpers() {
        let project = Project::new(3, "backend-api").with_alias("api").with_parent(1);
        assert_eq!(project.id, 3);
        assert_eq!(project.alias.as_deref(), Some("api"));
        assert_eq!(project.parent_id, Some(1));
        assert!(!project.archived);
        assert!(Project::new(4, "old").archived().archived);
    }

    #[test]
    fn test_alias_matches_ignores_case() {
        let project = Project::new(1, "Backend").with_alias("BE");
        assert!(project.alias_matches("be"));
        assert!(project.alias_matches("BE"));
        assert!(!project.alias_matches("backend"));
        assert!(!Project::new(2, "x").alias_matches("x"));
    }

    #[test]
    fn test_deserialize_minimal() {
        let json = r#"{"id": 7, "name": "home"}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.id, 7);
        assert_eq!(project.name, "home");
        assert!(project.alias.is_none());
        assert!(!project.archived);
    }

    #[test]
    fn test_serialize_skips_none_values() {
        let json = serde_json::to_string(&Project::new(1, "home")).unwrap();
        assert!(!json.contains("alias"));
        assert!(!json.contains("parent_id"));
        assert!(!json.contains("description"));
    }
}
