//! Error types for the component store

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in component store operations
#[derive(Error, Debug)]
pub enum ComponentError {
    /// No component with this name exists in the store or on disk
    #[error("Component not found: {0}")]
    NotFound(String),

    /// The component was loaded before but its backing file has since been deleted
    #[error("Component '{name}' was loaded but its file is missing: {}", path.display())]
    FileMissing { name: String, path: PathBuf },

    /// The store's backing directory does not exist
    #[error("Components directory not found: {}", .0.display())]
    DirectoryMissing(PathBuf),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The file is not valid UTF-8
    #[error("Invalid encoding in {path}: {message}")]
    InvalidEncoding { path: String, message: String },
}

impl ComponentError {
    /// Create a new component not found error
    pub fn not_found<S: Into<String>>(name: S) -> Self {
        Self::NotFound(name.into())
    }

    /// Whether the component is absent (unknown or deleted) rather than unreadable
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            ComponentError::NotFound(_) | ComponentError::FileMissing { .. }
        )
    }
}
