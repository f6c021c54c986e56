//! Content-addressed blob storage for photos and documents
//!
//! The catalog only ever persists the opaque stored name returned here;
//! file contents are never interpreted. Names derive from the content
//! hash, so attaching the same bytes twice shares one blob on disk.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::core::project::Project;

/// Blob storage rooted at the project's uploads directory
#[derive(Debug)]
pub struct BlobStore {
    root: PathBuf,
}

/// Reference to a stored blob
#[derive(Debug, Clone)]
pub struct StoredBlob {
    /// Opaque name the catalog persists
    pub stored_name: String,
    /// The user-supplied file name, kept for display
    pub original_name: String,
}

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("cannot read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("cannot write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

impl BlobStore {
    pub fn open(project: &Project) -> Self {
        Self {
            root: project.uploads_dir(),
        }
    }

    /// Copy a source file into the store; returns the opaque reference
    pub fn store(&self, source: &Path) -> Result<StoredBlob, BlobError> {
        let bytes = fs::read(source).map_err(|e| BlobError::Read {
            path: source.to_path_buf(),
            message: e.to_string(),
        })?;
        let original_name = source
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        self.store_bytes(&bytes, &original_name)
    }

    /// Store raw bytes under a content-addressed name
    pub fn store_bytes(&self, bytes: &[u8], original_name: &str) -> Result<StoredBlob, BlobError> {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let digest = hasher.finalize();
        let hex: String = digest.iter().take(8).map(|b| format!("{b:02x}")).collect();

        let stored_name = match Path::new(original_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
        {
            Some(ext) if !ext.is_empty() => format!("{hex}.{ext}"),
            _ => hex,
        };

        fs::create_dir_all(&self.root).map_err(|e| BlobError::Write {
            path: self.root.clone(),
            message: e.to_string(),
        })?;
        let destination = self.root.join(&stored_name);
        if !destination.exists() {
            fs::write(&destination, bytes).map_err(|e| BlobError::Write {
                path: destination.clone(),
                message: e.to_string(),
            })?;
        }

        Ok(StoredBlob {
            stored_name,
            original_name: original_name.to_string(),
        })
    }

    /// Where a stored blob lives on disk (the `url_for` analog)
    pub fn path_for(&self, stored_name: &str) -> PathBuf {
        self.root.join(stored_name)
    }
}
