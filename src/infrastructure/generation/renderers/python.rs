//! Python renderer: click-based package with a `src/` layout

use serde_json::{Value as JsonValue, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::generation::filters::{TypeTable, map_type, shared_filters, string_filter, type_filter};
use crate::generation::sanitizers::{escape_python_string, python_safe_name, sanitize_description};
use crate::generation::utils::to_snake_case;
use crate::generation::{
    FilterTable, GenerationError, LanguageRenderer, OutputStructure, RenderContext,
};
use crate::infrastructure::generation::renderers::shared::{HookStyle, base_context};
use crate::ir::IntermediateRepresentation;

pub const PYTHON_TYPES: TypeTable = &[
    ("string", "str"),
    ("str", "str"),
    ("integer", "int"),
    ("int", "int"),
    ("float", "float"),
    ("number", "float"),
    ("boolean", "bool"),
    ("bool", "bool"),
    ("flag", "bool"),
    ("list", "list"),
    ("array", "list"),
    ("map", "dict"),
    ("dict", "dict"),
    ("object", "dict"),
    ("path", "Path"),
    ("file", "Path"),
];

const PYTHON_FALLBACK_TYPE: &str = "str";

const BASE_DEPENDENCIES: &[&str] = &["click>=8.0"];

/// Renders the Python variant
#[derive(Debug, Clone, Default)]
pub struct PythonRenderer;

impl PythonRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Importable package name derived from `project.package_name`
    fn python_package(ir: &IntermediateRepresentation) -> String {
        to_snake_case(&ir.project.package_name)
    }

    fn imports(ir: &IntermediateRepresentation) -> Vec<String> {
        let mut imports = vec![
            "import sys".to_string(),
            "from pathlib import Path".to_string(),
            "import click".to_string(),
        ];
        if ir.interactive_enabled() {
            imports.push("import shlex".to_string());
        }
        imports
    }

    fn pyproject(ir: &IntermediateRepresentation, package: &str) -> JsonValue {
        let dependencies: Vec<String> = BASE_DEPENDENCIES
            .iter()
            .map(|d| d.to_string())
            .chain(ir.dependencies.python.iter().cloned())
            .collect();
        let distribution = ir
            .installation
            .pypi_name
            .clone()
            .unwrap_or_else(|| ir.project.package_name.clone());

        json!({
            "name": distribution,
            "version": ir.version_or_default(),
            "description": ir.project.description,
            "dependencies": dependencies,
            "scripts": { ir.project.command_name.clone(): format!("{package}.cli:main") },
        })
    }
}

fn python_docstring(text: &str) -> String {
    sanitize_description(text).replace("\"\"\"", "\\\"\\\"\\\"")
}

impl LanguageRenderer for PythonRenderer {
    fn language(&self) -> &str {
        "python"
    }

    fn file_extensions(&self) -> BTreeMap<&'static str, &'static str> {
        BTreeMap::from([
            ("command_handler", "py"),
            ("hook_system", "py"),
            ("package_init", "py"),
            ("package_config", "toml"),
            ("setup_script", "sh"),
        ])
    }

    fn get_template_context(
        &self,
        ir: &IntermediateRepresentation,
    ) -> Result<RenderContext, GenerationError> {
        let (mut context, _) = base_context(ir, self.language(), HookStyle::Snake, to_snake_case)?;
        let package = Self::python_package(ir);

        let types: BTreeMap<&str, &str> = PYTHON_TYPES.iter().copied().collect();
        context.add_serialized("types", &types)?;
        context.add_variable("imports", json!(Self::imports(ir)));
        context.add_variable("pyproject", Self::pyproject(ir, &package));
        context.add_variable("python_package", json!(package));
        Ok(context)
    }

    fn get_custom_filters(&self) -> FilterTable {
        let mut filters = shared_filters();
        filters.insert(
            "python_type".into(),
            type_filter(PYTHON_TYPES, PYTHON_FALLBACK_TYPE),
        );
        filters.insert("py_string".into(), string_filter("py_string", escape_python_string));
        filters.insert("py_safe_name".into(), string_filter("py_safe_name", python_safe_name));
        filters.insert(
            "python_docstring".into(),
            string_filter("python_docstring", python_docstring),
        );
        // Option helpers: `{{ opt | py_default }}` renders a Python literal
        filters.insert(
            "py_default".into(),
            Arc::new(|value: &JsonValue, _args: &HashMap<String, JsonValue>| {
                Ok(JsonValue::String(python_literal(value)))
            }),
        );
        filters
    }

    fn get_output_structure(&self, ir: &IntermediateRepresentation) -> OutputStructure {
        let package = Self::python_package(ir);
        let cli_path = match &ir.project.cli_output_path {
            Some(path) if !path.trim().is_empty() => path.replace("{package_name}", &package),
            _ => format!("src/{package}/cli.py"),
        };

        OutputStructure::from([
            ("python/command_handler".to_string(), cli_path),
            (
                "python/package_init".to_string(),
                format!("src/{package}/__init__.py"),
            ),
            (
                "python/hooks_template".to_string(),
                format!("src/{package}/cli_hooks.py"),
            ),
            ("python/pyproject".to_string(), "pyproject.toml".to_string()),
            ("shared/setup_script".to_string(), "setup.sh".to_string()),
            ("shared/readme".to_string(), "README.md".to_string()),
        ])
    }
}

/// Python source literal for a JSON value
fn python_literal(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "None".to_string(),
        JsonValue::Bool(true) => "True".to_string(),
        JsonValue::Bool(false) => "False".to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => escape_python_string(s),
        JsonValue::Array(items) => {
            let items: Vec<String> = items.iter().map(python_literal).collect();
            format!("[{}]", items.join(", "))
        }
        JsonValue::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", escape_python_string(k), python_literal(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

/// Python type for an abstract tag
pub fn python_type(tag: &str) -> &'static str {
    map_type(PYTHON_TYPES, PYTHON_FALLBACK_TYPE, &json!(tag))
}
