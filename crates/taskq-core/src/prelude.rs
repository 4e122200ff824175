//! Prelude module for convenient imports.
//!
//! Re-exports the types most callers of the query pipeline need.
//!
//! # Example
//!
//! ```
//! use taskq_core::prelude::*;
//!
//! let filter = TaskFilter::default();
//! assert!(filter.status.is_unset());
//! ```

// Filter types
pub use crate::filter::{DateFilter, FieldFilter, SortBy, SortOrder, TaskFilter};

// Lookup collaborator
pub use crate::lookup::{LookupError, ProjectCatalog, ProjectLookup};

// Data models
pub use crate::models::{ParseEnumError, Priority, Project, TaskStatus};

// Storage
pub use crate::store::{CatalogStore, CatalogStoreError};
