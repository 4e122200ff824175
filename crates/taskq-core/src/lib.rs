//! Core types for the taskq task manager.
//!
//! # Quick Start
//!
//! ```
//! use taskq_core::prelude::*;
//! ```
//!
//! This crate holds the domain models ([`Project`], [`TaskStatus`], [`Priority`]),
//! the storage-ready [`TaskFilter`] produced by the query language, and the
//! read-only [`ProjectLookup`] collaborator used to resolve project references.
//!
//! [`Project`]: models::Project
//! [`TaskStatus`]: models::TaskStatus
//! [`Priority`]: models::Priority
//! [`TaskFilter`]: filter::TaskFilter
//! [`ProjectLookup`]: lookup::ProjectLookup

pub mod filter;
pub mod lookup;
pub mod models;
pub mod prelude;
pub mod store;

pub use lookup::{LookupError, ProjectCatalog, ProjectLookup};
pub use store::{CatalogStore, CatalogStoreError};
