//! Intermediate representation consumed by the generation pipeline
//!
//! The IR is produced upstream (config loading is not part of this crate) and is
//! only ever read by renderers and the engine.

pub mod types;

pub use types::*;

use std::path::Path;

/// Errors raised while reading an IR document from disk
#[derive(thiserror::Error, Debug)]
pub enum IrLoadError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl IntermediateRepresentation {
    /// Read an IR document, choosing JSON or YAML by file extension.
    ///
    /// Files without a recognised extension are tried as JSON first, then YAML.
    pub fn from_path(path: &Path) -> Result<Self, IrLoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| IrLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content).or_else(|_| Self::from_yaml_str(&content)),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, IrLoadError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, IrLoadError> {
        Ok(serde_yaml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_yaml_str() {
        let ir = IntermediateRepresentation::from_yaml_str(
            r#"
project:
  name: Demo
  package_name: demo
  command_name: demo
cli:
  root_command:
    name: demo
    subcommands:
      - name: build
        options:
          - name: release
            type: flag
dependencies:
  rust: [regex]
"#,
        )
        .unwrap();

        let root = ir.root_command();
        assert_eq!(root.subcommands.len(), 1);
        assert!(root.subcommands[0].options[0].is_flag());
        assert_eq!(ir.dependencies.rust, vec!["regex".to_string()]);
    }

    #[test]
    fn test_from_path_picks_format_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ir.json");
        std::fs::write(
            &path,
            r#"{"project": {"name": "Demo"}, "cli": {"root_command": {"name": "demo"}}}"#,
        )
        .unwrap();

        let ir = IntermediateRepresentation::from_path(&path).unwrap();
        assert_eq!(ir.project.name, "Demo");
        assert_eq!(ir.root_command().name, "demo");
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = IntermediateRepresentation::from_path(Path::new("/nonexistent/ir.yaml"));
        assert!(matches!(result, Err(IrLoadError::Io { .. })));
    }
}
