//! Core types for the generation domain

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Final artifact of a run: output path to generated text
pub type OutputFileMap = BTreeMap<PathBuf, String>;

/// Component name to relative output path, as declared by a renderer
pub type OutputStructure = BTreeMap<String, String>;

/// Built-in target languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Python,
    NodeJs,
    TypeScript,
    Rust,
}

impl Language {
    /// Tag used to register and select the renderer
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::NodeJs => "nodejs",
            Language::TypeScript => "typescript",
            Language::Rust => "rust",
        }
    }

    /// Get the display name for this language
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::NodeJs => "Node.js",
            Language::TypeScript => "TypeScript",
            Language::Rust => "Rust",
        }
    }

    /// Get all built-in languages
    pub fn all() -> Vec<Language> {
        vec![
            Language::Python,
            Language::NodeJs,
            Language::TypeScript,
            Language::Rust,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = crate::generation::GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "nodejs" | "node" | "js" | "javascript" => Ok(Language::NodeJs),
            "typescript" | "ts" => Ok(Language::TypeScript),
            "rust" | "rs" => Ok(Language::Rust),
            _ => Err(crate::generation::GenerationError::InvalidLanguage(
                s.to_string(),
            )),
        }
    }
}

/// One output entry that was skipped during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentFailure {
    pub component: String,
    pub path: String,
    pub reason: String,
}

/// Terminal state of one generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    /// Every declared output entry rendered
    Completed,
    /// At least one entry was skipped; the rest rendered independently
    PartiallyFailed,
    /// Context building failed, nothing was rendered
    Aborted,
}

/// Outcome of [`GenerationEngine::generate`](crate::generation::GenerationEngine::generate)
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub language: String,
    pub files: OutputFileMap,
    pub failures: Vec<ComponentFailure>,
    /// Number of output entries the renderer declared
    pub attempted: usize,
    /// Set when the context could not be built from the IR
    pub aborted: Option<String>,
}

impl GenerationReport {
    pub(crate) fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            files: OutputFileMap::new(),
            failures: Vec::new(),
            attempted: 0,
            aborted: None,
        }
    }

    pub fn status(&self) -> GenerationStatus {
        if self.aborted.is_some() {
            GenerationStatus::Aborted
        } else if self.failures.is_empty() {
            GenerationStatus::Completed
        } else {
            GenerationStatus::PartiallyFailed
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }

    /// Names of the components that did not make it into the file map
    pub fn failed_components(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.component.as_str()).collect()
    }
}
