//! Tokenizer and project mention extraction.
//!
//! A query is split on whitespace. Tokens of the form `@name` and `@~name`
//! reference a project by exact or fuzzy name; everything else is kept, in
//! order, as the base query for the field parser.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::QueryResult;

/// Prefix of every mention token.
const MENTION_PREFIX: char = '@';

/// Marker after the prefix that requests fuzzy matching.
const FUZZY_MARKER: char = '~';

/// A reference to a project by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectMention {
    /// The referenced name, case preserved.
    pub name: String,
    /// True for `@~name`, false for `@name`.
    pub fuzzy: bool,
}

impl ProjectMention {
    /// Creates an exact mention (`@name`).
    pub fn exact(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fuzzy: false,
        }
    }

    /// Creates a fuzzy mention (`@~name`).
    pub fn fuzzy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fuzzy: true,
        }
    }

    /// Parses a single token as a mention.
    ///
    /// Returns `None` unless the token is `@` or `@~` followed by one or more
    /// letters, digits, hyphens or underscores.
    pub fn from_token(token: &str) -> Option<Self> {
        let rest = token.strip_prefix(MENTION_PREFIX)?;
        let (name, fuzzy) = match rest.strip_prefix(FUZZY_MARKER) {
            Some(name) => (name, true),
            None => (rest, false),
        };

        if name.is_empty() || !name.chars().all(is_name_char) {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            fuzzy,
        })
    }
}

impl fmt::Display for ProjectMention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fuzzy {
            write!(f, "{MENTION_PREFIX}{FUZZY_MARKER}{}", self.name)
        } else {
            write!(f, "{MENTION_PREFIX}{}", self.name)
        }
    }
}

/// A query with its project mentions pulled out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMentionQuery {
    /// The remaining tokens joined by single spaces.
    pub base_query: String,
    /// Mentions in encounter order, duplicates kept.
    pub project_mentions: Vec<ProjectMention>,
}

/// Splits a query into whitespace-separated tokens.
pub fn tokenize(input: &str) -> Vec<&str> {
    input.split_whitespace().collect()
}

/// Extracts `@name` / `@~name` mentions from a query.
///
/// This never fails: unknown names are a resolution concern, not a syntax
/// one. The `Result` keeps the signature in line with the rest of the
/// pipeline.
pub fn parse_project_mentions(input: &str) -> QueryResult<ProjectMentionQuery> {
    let mut base = Vec::new();
    let mut project_mentions = Vec::new();

    for token in tokenize(input) {
        match ProjectMention::from_token(token) {
            Some(mention) => {
                trace!(%mention, "extracted project mention");
                project_mentions.push(mention);
            }
            None => base.push(token),
        }
    }

    Ok(ProjectMentionQuery {
        base_query: base.join(" "),
        project_mentions,
    })
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
