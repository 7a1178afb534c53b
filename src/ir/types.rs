//! Typed shape of the intermediate representation
//!
//! Every field defaults so that loosely populated descriptions still deserialize.
//! Presence of the required identifiers is checked by [`IntermediateRepresentation::validate_required`],
//! which renderers call before building a context.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::generation::GenerationError;

/// Language-neutral description of a CLI handed to the generation pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntermediateRepresentation {
    pub project: ProjectMetadata,
    pub cli: Option<CliSchema>,
    pub dependencies: Dependencies,
    pub installation: Installation,
    pub metadata: BTreeMap<String, JsonValue>,
}

/// Project identity and packaging metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectMetadata {
    pub name: String,
    pub version: String,
    pub description: String,
    pub package_name: String,
    pub command_name: String,
    pub author: String,
    pub license: String,
    /// Python: override for the main CLI module path, `{package_name}` is substituted
    pub cli_output_path: Option<String>,
    /// TypeScript: override for the main CLI module path
    pub cli_path: Option<String>,
    /// TypeScript: override for the hooks module path
    pub cli_hooks_path: Option<String>,
    /// TypeScript: override for the type declaration path
    pub cli_types_path: Option<String>,
}

/// Command tree and feature switches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliSchema {
    pub root_command: Command,
    pub features: Features,
}

/// A command (the root or any nested subcommand)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Command {
    pub name: String,
    pub description: String,
    pub version: Option<String>,
    pub arguments: Vec<Argument>,
    pub options: Vec<CliOption>,
    pub subcommands: Vec<Command>,
    /// Explicit hook stem; the renderer still applies its naming convention
    pub hook_name: Option<String>,
    pub aliases: Vec<String>,
}

/// Positional argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Argument {
    pub name: String,
    pub description: String,
    pub required: bool,
    #[serde(rename = "type")]
    pub arg_type: String,
    pub default: Option<JsonValue>,
    pub choices: Option<Vec<String>>,
    pub multiple: bool,
}

impl Default for Argument {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            required: true,
            arg_type: "string".to_string(),
            default: None,
            choices: None,
            multiple: false,
        }
    }
}

/// Named option (`--name` / `-n`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliOption {
    pub name: String,
    pub short: Option<String>,
    pub description: String,
    pub required: bool,
    #[serde(rename = "type")]
    pub opt_type: String,
    pub default: Option<JsonValue>,
    pub choices: Option<Vec<String>>,
    pub multiple: bool,
}

impl Default for CliOption {
    fn default() -> Self {
        Self {
            name: String::new(),
            short: None,
            description: String::new(),
            required: false,
            opt_type: "string".to_string(),
            default: None,
            choices: None,
            multiple: false,
        }
    }
}

impl CliOption {
    /// Whether the option is a boolean switch rather than a value option
    pub fn is_flag(&self) -> bool {
        matches!(
            self.opt_type.to_lowercase().as_str(),
            "flag" | "bool" | "boolean"
        )
    }
}

/// Optional generated-CLI features
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub interactive_mode: FeatureToggle,
    pub completion: FeatureToggle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureToggle {
    pub enabled: bool,
}

/// Extra package-manager dependencies, one list per ecosystem
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dependencies {
    pub python: Vec<String>,
    pub nodejs: Vec<String>,
    pub typescript: Vec<String>,
    pub rust: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Installation {
    pub pypi_name: Option<String>,
    pub npm_name: Option<String>,
}

impl IntermediateRepresentation {
    /// Check the identifiers every renderer depends on.
    ///
    /// Fails with [`GenerationError::MalformedInput`] naming the first absent field.
    pub fn validate_required(&self) -> Result<(), GenerationError> {
        let required = [
            ("project.name", self.project.name.as_str()),
            ("project.package_name", self.project.package_name.as_str()),
            ("project.command_name", self.project.command_name.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(GenerationError::MalformedInput(format!(
                    "missing required field `{field}`"
                )));
            }
        }

        let cli = self.cli.as_ref().ok_or_else(|| {
            GenerationError::MalformedInput("missing required section `cli`".to_string())
        })?;
        if cli.root_command.name.trim().is_empty() {
            return Err(GenerationError::MalformedInput(
                "missing required field `cli.root_command.name`".to_string(),
            ));
        }

        Ok(())
    }

    /// Root command, or a default empty command when the cli section is absent
    pub fn root_command(&self) -> Command {
        self.cli
            .as_ref()
            .map(|cli| cli.root_command.clone())
            .unwrap_or_default()
    }

    /// Whether the generated CLI should ship an interactive mode
    pub fn interactive_enabled(&self) -> bool {
        self.cli
            .as_ref()
            .is_some_and(|cli| cli.features.interactive_mode.enabled)
    }

    /// Version with the conventional fallback applied
    pub fn version_or_default(&self) -> &str {
        if self.project.version.trim().is_empty() {
            "0.1.0"
        } else {
            &self.project.version
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_ir() -> IntermediateRepresentation {
        IntermediateRepresentation {
            project: ProjectMetadata {
                name: "Demo".to_string(),
                package_name: "demo-cli".to_string(),
                command_name: "demo".to_string(),
                ..Default::default()
            },
            cli: Some(CliSchema {
                root_command: Command {
                    name: "demo".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_required_accepts_minimal_ir() {
        assert!(valid_ir().validate_required().is_ok());
    }

    #[test]
    fn test_validate_required_rejects_missing_project_name() {
        let mut ir = valid_ir();
        ir.project.name.clear();

        match ir.validate_required() {
            Err(GenerationError::MalformedInput(msg)) => assert!(msg.contains("project.name")),
            other => panic!("Expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_required_rejects_missing_cli() {
        let mut ir = valid_ir();
        ir.cli = None;

        assert!(matches!(
            ir.validate_required(),
            Err(GenerationError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_argument_defaults_to_required_string() {
        let arg: Argument = serde_json::from_str(r#"{"name": "path"}"#).unwrap();
        assert!(arg.required);
        assert_eq!(arg.arg_type, "string");
        assert!(!arg.multiple);
    }

    #[test]
    fn test_option_flag_detection() {
        let opt: CliOption = serde_json::from_str(r#"{"name": "force", "type": "flag"}"#).unwrap();
        assert!(opt.is_flag());
        assert!(!opt.required);
    }

    #[test]
    fn test_version_fallback() {
        let mut ir = valid_ir();
        assert_eq!(ir.version_or_default(), "0.1.0");
        ir.project.version = "2.1.0".to_string();
        assert_eq!(ir.version_or_default(), "2.1.0");
    }
}
