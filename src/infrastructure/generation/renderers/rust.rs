//! Rust renderer: clap derive binary crate

use serde::Serialize;
use serde_json::{Value as JsonValue, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::generation::filters::{TypeTable, map_type, shared_filters, string_filter, type_filter};
use crate::generation::sanitizers::{escape_rust_string, rust_safe_name, sanitize_description};
use crate::generation::utils::{to_kebab_case, to_pascal_case, to_snake_case};
use crate::generation::{
    FilterTable, GenerationError, LanguageRenderer, OutputStructure, RenderContext,
};
use crate::infrastructure::generation::renderers::shared::{
    CommandEntry, HookStyle, base_context,
};
use crate::ir::IntermediateRepresentation;

pub const RUST_TYPES: TypeTable = &[
    ("string", "String"),
    ("str", "String"),
    ("integer", "i64"),
    ("int", "i64"),
    ("float", "f64"),
    ("number", "f64"),
    ("boolean", "bool"),
    ("bool", "bool"),
    ("flag", "bool"),
    ("list", "Vec<String>"),
    ("array", "Vec<String>"),
    ("map", "std::collections::HashMap<String, String>"),
    ("dict", "std::collections::HashMap<String, String>"),
    ("object", "std::collections::HashMap<String, String>"),
    ("path", "std::path::PathBuf"),
    ("file", "std::path::PathBuf"),
];

const RUST_FALLBACK_TYPE: &str = "String";

/// Base crates of a generated CLI, as TOML dependency values
const BASE_CARGO_DEPENDENCIES: &[(&str, &str)] = &[
    ("clap", r#"{ version = "4.5", features = ["derive"] }"#),
    ("serde", r#"{ version = "1.0", features = ["derive"] }"#),
    ("serde_json", r#""1.0""#),
    ("anyhow", r#""1.0""#),
    ("thiserror", r#""1.0""#),
];

/// One field of a generated clap args struct
#[derive(Debug, Clone, Serialize)]
struct StructField {
    name: String,
    /// Original IR name, used for `--long` spelling
    long: String,
    short: Option<String>,
    #[serde(rename = "type")]
    field_type: String,
    positional: bool,
    description: String,
    default: Option<JsonValue>,
}

/// Args struct for one command; groups also get a `<variant>Commands` enum
#[derive(Debug, Clone, Serialize)]
struct ArgsStruct {
    name: String,
    /// Name as typed on the command line
    cli_name: String,
    command: String,
    description: String,
    variant: String,
    /// Variant of the enclosing group; `None` below the root
    parent_variant: Option<String>,
    depth: usize,
    has_subcommands: bool,
    hook_name: String,
    fields: Vec<StructField>,
}

fn field_type(tag: &str, required: bool, multiple: bool, flag: bool) -> String {
    if flag {
        return "bool".to_string();
    }
    let base = map_type(RUST_TYPES, RUST_FALLBACK_TYPE, &json!(tag));
    if multiple {
        format!("Vec<{base}>")
    } else if required {
        base.to_string()
    } else {
        format!("Option<{base}>")
    }
}

/// One args struct per command.
///
/// Distinct command paths can collapse to the same type name (`a-b` and `a b`
/// both give `ABArgs`); that is reported as malformed input.
fn structs(commands: &[CommandEntry]) -> Result<Vec<ArgsStruct>, GenerationError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut structs = Vec::with_capacity(commands.len());

    for entry in commands {
        let variant = to_pascal_case(&entry.stem);
        if let Some(previous) = seen.insert(variant.clone(), &entry.full_name) {
            return Err(GenerationError::MalformedInput(format!(
                "commands `{previous}` and `{}` both map to Rust type `{variant}Args`",
                entry.full_name
            )));
        }

        let arguments = entry.arguments.iter().map(|arg| StructField {
            name: rust_safe_name(&to_snake_case(&arg.name)),
            long: to_kebab_case(&arg.name),
            short: None,
            field_type: field_type(&arg.arg_type, arg.required, arg.multiple, false),
            positional: true,
            description: arg.description.clone(),
            default: arg.default.clone(),
        });
        let options = entry.options.iter().map(|opt| StructField {
            name: rust_safe_name(&to_snake_case(&opt.name)),
            long: to_kebab_case(&opt.name),
            short: opt.short.clone(),
            field_type: field_type(&opt.opt_type, opt.required, opt.multiple, opt.is_flag()),
            positional: false,
            description: opt.description.clone(),
            default: opt.default.clone(),
        });

        structs.push(ArgsStruct {
            name: format!("{variant}Args"),
            cli_name: entry.name.clone(),
            command: entry.full_name.clone(),
            description: entry.description.clone(),
            parent_variant: entry.parent_stem.as_deref().map(to_pascal_case),
            variant,
            depth: entry.depth,
            has_subcommands: entry.has_subcommands,
            hook_name: entry.hook_name.clone(),
            fields: arguments.chain(options).collect(),
        });
    }
    Ok(structs)
}

/// Text for a `///` or `//!` comment: cleaned up, and every extra line carries
/// the marker again so it cannot escape the comment.
fn rust_doc(text: &str, indent: &str, marker: &str) -> String {
    let cleaned = sanitize_description(text);
    cleaned
        .lines()
        .collect::<Vec<_>>()
        .join(&format!("\n{indent}{marker} "))
}

/// Renders the Rust variant
#[derive(Debug, Clone, Default)]
pub struct RustRenderer;

impl RustRenderer {
    pub fn new() -> Self {
        Self
    }

    fn use_statements() -> Vec<String> {
        vec![
            "use anyhow::Result;".to_string(),
            "use clap::{Args, Parser, Subcommand};".to_string(),
        ]
    }

    /// Base crates plus the IR's extras; extras already in the base set keep the base value
    fn cargo_dependencies(ir: &IntermediateRepresentation) -> BTreeMap<String, String> {
        let mut dependencies: BTreeMap<String, String> = BASE_CARGO_DEPENDENCIES
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        for name in &ir.dependencies.rust {
            let name = name.trim();
            if !name.is_empty() {
                dependencies
                    .entry(name.to_string())
                    .or_insert_with(|| r#""*""#.to_string());
            }
        }
        dependencies
    }
}

impl LanguageRenderer for RustRenderer {
    fn language(&self) -> &str {
        "rust"
    }

    fn file_extensions(&self) -> BTreeMap<&'static str, &'static str> {
        BTreeMap::from([
            ("command_handler", "rs"),
            ("hook_system", "rs"),
            ("package_config", "toml"),
            ("setup_script", "sh"),
        ])
    }

    fn get_template_context(
        &self,
        ir: &IntermediateRepresentation,
    ) -> Result<RenderContext, GenerationError> {
        let (mut context, commands) =
            base_context(ir, self.language(), HookStyle::Snake, to_snake_case)?;

        context.add_variable("use_statements", json!(Self::use_statements()));
        context.add_serialized("cargo_dependencies", &Self::cargo_dependencies(ir))?;
        context.add_serialized("structs", &structs(&commands)?)?;
        context.add_variable(
            "rust_package_name",
            json!(to_kebab_case(&ir.project.package_name)),
        );
        Ok(context)
    }

    fn get_custom_filters(&self) -> FilterTable {
        let mut filters = shared_filters();
        filters.insert("rust_type".into(), type_filter(RUST_TYPES, RUST_FALLBACK_TYPE));
        filters.insert("rust_string".into(), string_filter("rust_string", escape_rust_string));
        filters.insert("rust_safe_name".into(), string_filter("rust_safe_name", rust_safe_name));
        filters.insert(
            "rust_optional".into(),
            Arc::new(|value: &JsonValue, _args: &HashMap<String, JsonValue>| {
                let inner = value.as_str().unwrap_or(RUST_FALLBACK_TYPE);
                Ok(JsonValue::String(format!("Option<{inner}>")))
            }),
        );
        filters.insert(
            "rust_vec".into(),
            Arc::new(|value: &JsonValue, _args: &HashMap<String, JsonValue>| {
                let inner = value.as_str().unwrap_or(RUST_FALLBACK_TYPE);
                Ok(JsonValue::String(format!("Vec<{inner}>")))
            }),
        );
        filters.insert(
            "rust_doc".into(),
            Arc::new(|value: &JsonValue, args: &HashMap<String, JsonValue>| {
                let text = value.as_str().unwrap_or_default();
                let indent = args.get("indent").and_then(JsonValue::as_str).unwrap_or("");
                let marker = args.get("marker").and_then(JsonValue::as_str).unwrap_or("///");
                Ok(JsonValue::String(rust_doc(text, indent, marker)))
            }),
        );
        filters
    }

    fn get_output_structure(&self, _ir: &IntermediateRepresentation) -> OutputStructure {
        OutputStructure::from([
            ("rust/main".to_string(), "src/main.rs".to_string()),
            ("rust/hooks_template".to_string(), "src/hooks.rs".to_string()),
            ("rust/cargo_toml".to_string(), "Cargo.toml".to_string()),
            ("shared/setup_script".to_string(), "setup.sh".to_string()),
        ])
    }
}
