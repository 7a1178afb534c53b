//! Per-component metadata tracked by the store

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// `{# Dependencies: base.tera, shared/header.tera #}`
static DEPENDENCY_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{#-?\s*Dependencies:\s*([^#]*?)\s*-?#\}").unwrap());

/// Metadata for one loaded component
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentMetadata {
    pub name: String,
    pub path: PathBuf,
    /// Direct dependencies as declared in the component's own text
    pub dependencies: Vec<String>,
    /// Modification time observed at load or last refresh
    pub last_modified: Option<SystemTime>,
    pub loaded_at: DateTime<Utc>,
}

impl ComponentMetadata {
    /// Build metadata for a component just read from `path`
    pub fn from_content(name: &str, path: &Path, content: &str, extension: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_path_buf(),
            dependencies: parse_dependencies(content, extension),
            last_modified: modified_time(path),
            loaded_at: Utc::now(),
        }
    }

    /// Whether the file on disk has changed (or vanished) since it was recorded
    pub fn is_stale(&self) -> bool {
        match modified_time(&self.path) {
            Some(current) => self.last_modified != Some(current),
            None => true,
        }
    }

    /// Record the file's current modification time
    pub fn refresh_metadata(&mut self) {
        self.last_modified = modified_time(&self.path);
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Parse the dependency comments in `content`.
///
/// Entries keep their declared order, lose the component extension, and are
/// de-duplicated. Nothing is resolved or checked for cycles.
pub fn parse_dependencies(content: &str, extension: &str) -> Vec<String> {
    let suffix = format!(".{extension}");
    let mut dependencies: Vec<String> = Vec::new();

    for captures in DEPENDENCY_COMMENT.captures_iter(content) {
        for entry in captures[1].split(',') {
            let entry = entry.trim();
            let name = entry.strip_suffix(suffix.as_str()).unwrap_or(entry);
            if !name.is_empty() && !dependencies.iter().any(|d| d == name) {
                dependencies.push(name.to_string());
            }
        }
    }

    dependencies
}
