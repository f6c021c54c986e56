//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Marker directory that identifies a packlist project root
const MARKER_DIR: &str = ".packlist";

/// Database file location within the marker directory
const DB_FILE: &str = "packlist.db";

/// Directory for uploaded photo/document blobs
const UPLOADS_DIR: &str = "uploads";

/// Represents a packlist project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .packlist/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current =
            std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            let marker = current.join(MARKER_DIR);
            if marker.is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let marker = root.join(MARKER_DIR);
        if marker.exists() {
            return Err(ProjectError::AlreadyExists(root.clone()));
        }

        Self::scaffold(&root)?;
        Ok(Self { root })
    }

    /// Force initialization even if .packlist/ exists
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::scaffold(&root)?;
        Ok(Self { root })
    }

    fn scaffold(root: &Path) -> Result<(), ProjectError> {
        let marker = root.join(MARKER_DIR);
        std::fs::create_dir_all(&marker).map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::create_dir_all(root.join(UPLOADS_DIR))
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        let config_path = marker.join("config.yaml");
        if !config_path.exists() {
            std::fs::write(&config_path, Self::default_config())
                .map_err(|e| ProjectError::IoError(e.to_string()))?;
        }

        Ok(())
    }

    fn default_config() -> &'static str {
        r#"# packlist project configuration

# Operator name recorded in the audit trail (can be overridden by global config)
# operator: ""

# Default output format (auto, tsv, json, csv, md, id)
# default_format: auto

# CSV field delimiter for export and as import fallback (";" or ",")
# csv_delimiter: ","
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .packlist configuration directory
    pub fn packlist_dir(&self) -> PathBuf {
        self.root.join(MARKER_DIR)
    }

    /// Get the catalog database path
    pub fn db_path(&self) -> PathBuf {
        self.packlist_dir().join(DB_FILE)
    }

    /// Get the directory where photo/document blobs are stored
    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join(UPLOADS_DIR)
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a packlist project (searched from {searched_from:?}). Run 'packlist init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("packlist project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_project_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        assert!(project.packlist_dir().exists());
        assert!(project.packlist_dir().join("config.yaml").exists());
        assert!(project.uploads_dir().is_dir());
    }

    #[test]
    fn test_project_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let err = Project::init(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyExists(_)));
    }

    #[test]
    fn test_project_discover_finds_marker_dir() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        // Create a subdirectory
        let subdir = tmp.path().join("some/nested/dir");
        std::fs::create_dir_all(&subdir).unwrap();

        // Discover from subdirectory should find root
        let project = Project::discover_from(&subdir).unwrap();
        assert_eq!(
            project.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_project_discover_fails_without_marker_dir() {
        let tmp = tempdir().unwrap();
        let err = Project::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));
    }
}
