//! Project catalog storage with XDG path support.
//!
//! The catalog is the list of projects that query references resolve
//! against. It is stored as JSON at `~/.local/share/tq/projects.json` on
//! Linux (the platform data directory elsewhere).
//!
//! Synchronous (`load`, `save`) and asynchronous (`load_async`) readers are
//! provided; the CLI loads asynchronously inside its tokio runtime.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::lookup::ProjectCatalog;
use crate::models::Project;

/// Default catalog filename.
const CATALOG_FILENAME: &str = "projects.json";

/// Application qualifier (for XDG paths).
const QUALIFIER: &str = "";

/// Application organization (for XDG paths).
const ORGANIZATION: &str = "";

/// Application name (for XDG paths).
const APPLICATION: &str = "tq";

/// Errors that can occur during catalog storage operations.
#[derive(Debug, Error)]
pub enum CatalogStoreError {
    /// Failed to determine the XDG data directory.
    #[error("failed to determine data directory: no valid home directory found")]
    NoDataDir,

    /// I/O error during file read.
    #[error("failed to read catalog file '{path}': {source}")]
    ReadError {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during file write.
    #[error("failed to write catalog file '{path}': {source}")]
    WriteError {
        /// The path that failed to write.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during directory creation.
    #[error("failed to create data directory '{path}': {source}")]
    CreateDirError {
        /// The directory path that failed to create.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for catalog store operations.
pub type Result<T> = std::result::Result<T, CatalogStoreError>;

/// On-disk layout of the catalog file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    projects: Vec<Project>,
}

/// Persistent storage for the project catalog.
///
/// # Example
///
/// ```no_run
/// use taskq_core::CatalogStore;
///
/// let store = CatalogStore::new()?;
/// let catalog = store.load_or_default()?;
/// println!("{} projects", catalog.len());
/// # Ok::<(), taskq_core::CatalogStoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CatalogStore {
    /// Path to the catalog file.
    path: PathBuf,
}

impl CatalogStore {
    /// Creates a store at the default XDG data path.
    ///
    /// # Errors
    ///
    /// Returns `CatalogStoreError::NoDataDir` if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        let path = Self::default_path()?;
        Ok(Self { path })
    }

    /// Creates a store with a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the default catalog path.
    ///
    /// # Errors
    ///
    /// Returns `CatalogStoreError::NoDataDir` if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(CatalogStoreError::NoDataDir)?;

        Ok(project_dirs.data_dir().join(CATALOG_FILENAME))
    }

    /// Returns the path to the catalog file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the catalog file exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the catalog from disk.
    ///
    /// # Errors
    ///
    /// - Returns `CatalogStoreError::ReadError` if the file cannot be read
    ///   (including when it does not exist).
    /// - Returns `CatalogStoreError::Json` if the file contains invalid JSON.
    pub fn load(&self) -> Result<ProjectCatalog> {
        let contents = fs::read_to_string(&self.path).map_err(|e| CatalogStoreError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;
        self.decode(&contents)
    }

    /// Loads the catalog, returning an empty one if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Same as [`load()`](Self::load), except that a missing file is not an error.
    pub fn load_or_default(&self) -> Result<ProjectCatalog> {
        match self.load() {
            Ok(catalog) => Ok(catalog),
            Err(CatalogStoreError::ReadError { ref source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                debug!(path = %self.path.display(), "catalog file missing, using empty catalog");
                Ok(ProjectCatalog::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Loads the catalog from disk asynchronously.
    ///
    /// # Errors
    ///
    /// Same as [`load()`](Self::load).
    pub async fn load_async(&self) -> Result<ProjectCatalog> {
        let contents =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| CatalogStoreError::ReadError {
                    path: self.path.clone(),
                    source: e,
                })?;
        self.decode(&contents)
    }

    /// Loads the catalog asynchronously, returning an empty one if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Same as [`load_or_default()`](Self::load_or_default).
    pub async fn load_or_default_async(&self) -> Result<ProjectCatalog> {
        match self.load_async().await {
            Ok(catalog) => Ok(catalog),
            Err(CatalogStoreError::ReadError { ref source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                debug!(path = %self.path.display(), "catalog file missing, using empty catalog");
                Ok(ProjectCatalog::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Saves the catalog to disk atomically (temp file + rename).
    ///
    /// # Errors
    ///
    /// - Returns `CatalogStoreError::CreateDirError` if the directory cannot be created.
    /// - Returns `CatalogStoreError::WriteError` if the file cannot be written.
    /// - Returns `CatalogStoreError::Json` if serialization fails.
    pub fn save(&self, catalog: &ProjectCatalog) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| CatalogStoreError::CreateDirError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let file = CatalogFile {
            projects: catalog.projects().to_vec(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &json).map_err(|e| CatalogStoreError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| CatalogStoreError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;

        Ok(())
    }

    fn decode(&self, contents: &str) -> Result<ProjectCatalog> {
        let file: CatalogFile = serde_json::from_str(contents)?;
        debug!(
            path = %self.path.display(),
            projects = file.projects.len(),
            "loaded project catalog"
        );
        Ok(ProjectCatalog::new(file.projects))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_path_ends_with_catalog_file() {
        let path = CatalogStore::default_path().expect("should get default path");
        assert!(path.ends_with(CATALOG_FILENAME));
        assert!(path.is_absolute(), "path should be absolute: {:?}", path);
    }

    #[test]
    fn test_with_custom_path() {
        let store = CatalogStore::with_path(PathBuf::from("/tmp/custom.json"));
        assert_eq!(store.path(), Path::new("/tmp/custom.json"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::with_path(dir.path().join("projects.json"));
        let catalog = ProjectCatalog::new(vec![
            Project::new(1, "backend").with_alias("be"),
            Project::new(2, "frontend").archived(),
        ]);

        store.save(&catalog).unwrap();
        assert!(store.exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn test_save_creates_directory_and_removes_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("projects.json");
        let store = CatalogStore::with_path(path.clone());

        store.save(&ProjectCatalog::default()).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_load_missing_file_is_read_error_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let store = CatalogStore::with_path(path.clone());

        let err = store.load().unwrap_err();
        match &err {
            CatalogStoreError::ReadError { path: p, source } => {
                assert_eq!(p, &path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected ReadError, got {other:?}"),
        }
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_load_or_default_for_missing_file() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::with_path(dir.path().join("missing.json"));
        let catalog = store.load_or_default().unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("projects.json");
        fs::write(&path, "{ not json").unwrap();

        let err = CatalogStore::with_path(path).load().unwrap_err();
        assert!(matches!(err, CatalogStoreError::Json(_)));
    }

    #[test]
    fn test_load_accepts_missing_projects_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("projects.json");
        fs::write(&path, "{}").unwrap();

        let catalog = CatalogStore::with_path(path).load().unwrap();
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_load_async_matches_sync() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::with_path(dir.path().join("projects.json"));
        let catalog = ProjectCatalog::new(vec![Project::new(9, "home")]);
        store.save(&catalog).unwrap();

        let loaded = store.load_async().await.unwrap();
        assert_eq!(loaded, catalog);
    }

    #[tokio::test]
    async fn test_load_or_default_async_missing_file() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::with_path(dir.path().join("missing.json"));
        let catalog = store.load_or_default_async().await.unwrap();
        assert!(catalog.is_empty());
    }
}
