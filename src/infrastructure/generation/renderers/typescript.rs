//! TypeScript renderer: commander-based package with type declarations

use serde::Serialize;
use serde_json::{Value as JsonValue, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::generation::filters::{TypeTable, map_type, shared_filters, string_filter, type_filter};
use crate::generation::sanitizers::{escape_js_string, ts_safe_name};
use crate::generation::utils::{to_camel_case, to_pascal_case};
use crate::generation::{
    FilterTable, GenerationError, LanguageRenderer, OutputStructure, RenderContext,
};
use crate::infrastructure::generation::renderers::nodejs::{npm_dependencies, package_config};
use crate::infrastructure::generation::renderers::shared::{
    CommandEntry, HookStyle, base_context,
};
use crate::ir::IntermediateRepresentation;

pub const TS_TYPES: TypeTable = &[
    ("string", "string"),
    ("str", "string"),
    ("integer", "number"),
    ("int", "number"),
    ("float", "number"),
    ("number", "number"),
    ("boolean", "boolean"),
    ("bool", "boolean"),
    ("flag", "boolean"),
    ("list", "any[]"),
    ("array", "any[]"),
    ("map", "Record<string, any>"),
    ("dict", "Record<string, any>"),
    ("object", "Record<string, any>"),
];

const TS_FALLBACK_TYPE: &str = "string";

const DEV_DEPENDENCIES: &[(&str, &str)] = &[("typescript", "^5.3.0"), ("@types/node", "^20.10.0")];

/// One field of a generated options interface
#[derive(Debug, Clone, Serialize)]
struct InterfaceField {
    name: String,
    #[serde(rename = "type")]
    field_type: String,
    optional: bool,
    description: String,
}

/// Typed shape of one command's parsed arguments and options
#[derive(Debug, Clone, Serialize)]
struct Interface {
    name: String,
    command: String,
    hook_name: String,
    has_subcommands: bool,
    fields: Vec<InterfaceField>,
}

fn ts_type(tag: &str, multiple: bool) -> String {
    let base = map_type(TS_TYPES, TS_FALLBACK_TYPE, &json!(tag));
    if multiple {
        format!("{base}[]")
    } else {
        base.to_string()
    }
}

fn interfaces(commands: &[CommandEntry]) -> Vec<Interface> {
    commands
        .iter()
        .map(|entry| {
            let arguments = entry.arguments.iter().map(|arg| InterfaceField {
                name: ts_safe_name(&to_camel_case(&arg.name)),
                field_type: ts_type(&arg.arg_type, arg.multiple),
                optional: !arg.required,
                description: arg.description.clone(),
            });
            let options = entry.options.iter().map(|opt| InterfaceField {
                name: ts_safe_name(&to_camel_case(&opt.name)),
                field_type: if opt.is_flag() {
                    "boolean".to_string()
                } else {
                    ts_type(&opt.opt_type, opt.multiple)
                },
                optional: !opt.required,
                description: opt.description.clone(),
            });

            Interface {
                name: format!("{}Options", to_pascal_case(&entry.stem)),
                command: entry.full_name.clone(),
                hook_name: entry.hook_name.clone(),
                has_subcommands: entry.has_subcommands,
                fields: arguments.chain(options).collect(),
            }
        })
        .collect()
}

/// `?` for optional properties. Objects with `optional` or `required` keys are
/// honoured; anything else is treated as required.
fn ts_optional(value: &JsonValue) -> &'static str {
    let optional = match value {
        JsonValue::Object(map) => match (map.get("optional"), map.get("required")) {
            (Some(optional), _) => optional.as_bool().unwrap_or(false),
            (None, Some(required)) => !required.as_bool().unwrap_or(true),
            (None, None) => false,
        },
        _ => false,
    };
    if optional { "?" } else { "" }
}

/// Renders the TypeScript variant
#[derive(Debug, Clone, Default)]
pub struct TypeScriptRenderer;

impl TypeScriptRenderer {
    pub fn new() -> Self {
        Self
    }

    fn imports(ir: &IntermediateRepresentation) -> Vec<String> {
        let mut imports = vec![
            "import { Command } from 'commander';".to_string(),
            "import chalk from 'chalk';".to_string(),
            "import * as hooks from './cli_hooks';".to_string(),
        ];
        if ir.interactive_enabled() {
            imports.push("import * as readline from 'node:readline';".to_string());
        }
        imports
    }

    fn path_or(value: &Option<String>, default: &str) -> String {
        match value {
            Some(path) if !path.trim().is_empty() => path.clone(),
            _ => default.to_string(),
        }
    }
}

impl LanguageRenderer for TypeScriptRenderer {
    fn language(&self) -> &str {
        "typescript"
    }

    fn file_extensions(&self) -> BTreeMap<&'static str, &'static str> {
        BTreeMap::from([
            ("command_handler", "ts"),
            ("hook_system", "ts"),
            ("types", "d.ts"),
            ("package_config", "json"),
            ("setup_script", "sh"),
        ])
    }

    fn get_template_context(
        &self,
        ir: &IntermediateRepresentation,
    ) -> Result<RenderContext, GenerationError> {
        let (mut context, commands) =
            base_context(ir, self.language(), HookStyle::Camel, to_camel_case)?;
        let dependencies = npm_dependencies(&ir.dependencies.typescript);
        let dev_dependencies: BTreeMap<&str, &str> = DEV_DEPENDENCIES.iter().copied().collect();

        let mut package = package_config(ir, "./dist/cli.js", &dependencies);
        package["devDependencies"] = json!(dev_dependencies);
        package["scripts"] = json!({ "build": "tsc" });

        context.add_variable("imports", json!(Self::imports(ir)));
        context.add_serialized("npm_dependencies", &dependencies)?;
        context.add_serialized("dev_dependencies", &dev_dependencies)?;
        context.add_variable("package_config", package);
        context.add_serialized("interfaces", &interfaces(&commands))?;
        context.add_variable(
            "js_command_name",
            json!(to_camel_case(&ir.project.command_name)),
        );
        Ok(context)
    }

    fn get_custom_filters(&self) -> FilterTable {
        let mut filters = shared_filters();
        filters.insert("ts_type".into(), type_filter(TS_TYPES, TS_FALLBACK_TYPE));
        filters.insert("js_string".into(), string_filter("js_string", escape_js_string));
        filters.insert("ts_safe_name".into(), string_filter("ts_safe_name", ts_safe_name));
        filters.insert(
            "ts_optional".into(),
            Arc::new(|value: &JsonValue, _args: &HashMap<String, JsonValue>| {
                Ok(JsonValue::String(ts_optional(value).to_string()))
            }),
        );
        filters.insert(
            "ts_array_type".into(),
            Arc::new(|value: &JsonValue, _args: &HashMap<String, JsonValue>| {
                let base = map_type(TS_TYPES, TS_FALLBACK_TYPE, value);
                Ok(JsonValue::String(format!("{base}[]")))
            }),
        );
        filters
    }

    fn get_output_structure(&self, ir: &IntermediateRepresentation) -> OutputStructure {
        OutputStructure::from([
            (
                "typescript/command_handler".to_string(),
                Self::path_or(&ir.project.cli_path, "cli.ts"),
            ),
            (
                "typescript/hooks_template".to_string(),
                Self::path_or(&ir.project.cli_hooks_path, "cli_hooks.ts"),
            ),
            (
                "typescript/types".to_string(),
                Self::path_or(&ir.project.cli_types_path, "cli_types.d.ts"),
            ),
            ("typescript/package_config".to_string(), "package.json".to_string()),
            ("typescript/tsconfig".to_string(), "tsconfig.json".to_string()),
            ("shared/setup_script".to_string(), "setup.sh".to_string()),
        ])
    }
}
