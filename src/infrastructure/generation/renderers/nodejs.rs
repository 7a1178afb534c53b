//! Node.js renderer: commander-based ES module package

use serde_json::{Value as JsonValue, json};
use std::collections::BTreeMap;

use crate::generation::filters::{TypeTable, shared_filters, string_filter, type_filter};
use crate::generation::sanitizers::{escape_js_string, js_safe_name};
use crate::generation::utils::{to_camel_case, to_kebab_case, to_pascal_case};
use crate::generation::{
    FilterTable, GenerationError, LanguageRenderer, OutputStructure, RenderContext,
};
use crate::infrastructure::generation::renderers::shared::{HookStyle, base_context};
use crate::ir::IntermediateRepresentation;

pub const JS_TYPES: TypeTable = &[
    ("string", "string"),
    ("str", "string"),
    ("integer", "number"),
    ("int", "number"),
    ("float", "number"),
    ("number", "number"),
    ("boolean", "boolean"),
    ("bool", "boolean"),
    ("flag", "boolean"),
    ("list", "Array"),
    ("array", "Array"),
    ("map", "Object"),
    ("dict", "Object"),
    ("object", "Object"),
];

const JS_FALLBACK_TYPE: &str = "string";

/// Runtime dependencies every generated Node.js or TypeScript CLI needs
pub(crate) const BASE_NPM_DEPENDENCIES: &[(&str, &str)] =
    &[("commander", "^11.1.0"), ("chalk", "^5.3.0")];

/// Normalise a name to something npm accepts: lowercase, no spaces, scope kept
pub(crate) fn npm_package_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut normalised: String = lowered
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' | '.' | '_' | '~' | '@' | '/' => c,
            _ => '-',
        })
        .collect();
    while normalised.starts_with('.') || normalised.starts_with('_') {
        normalised.remove(0);
    }
    normalised
}

/// Base npm dependencies plus the IR's extra packages at `*`
pub(crate) fn npm_dependencies(extra: &[String]) -> BTreeMap<String, String> {
    let mut dependencies: BTreeMap<String, String> = BASE_NPM_DEPENDENCIES
        .iter()
        .map(|(name, version)| (name.to_string(), version.to_string()))
        .collect();
    for package in extra {
        let package = package.trim();
        if !package.is_empty() {
            dependencies
                .entry(package.to_string())
                .or_insert_with(|| "*".to_string());
        }
    }
    dependencies
}

/// `package.json` fields shared by the Node.js and TypeScript variants
pub(crate) fn package_config(
    ir: &IntermediateRepresentation,
    bin_path: &str,
    dependencies: &BTreeMap<String, String>,
) -> JsonValue {
    let name = ir
        .installation
        .npm_name
        .clone()
        .unwrap_or_else(|| ir.project.package_name.clone());
    let license = if ir.project.license.is_empty() {
        "MIT"
    } else {
        ir.project.license.as_str()
    };

    json!({
        "name": npm_package_name(&name),
        "version": ir.version_or_default(),
        "description": ir.project.description,
        "type": "module",
        "bin": { ir.project.command_name.clone(): bin_path },
        "dependencies": dependencies,
        "license": license,
    })
}

fn hook_name(name: &str) -> String {
    HookStyle::Camel.hook_name(name)
}

/// Renders the Node.js variant
#[derive(Debug, Clone, Default)]
pub struct NodeJsRenderer;

impl NodeJsRenderer {
    pub fn new() -> Self {
        Self
    }

    fn imports(ir: &IntermediateRepresentation) -> Vec<String> {
        let mut imports = vec![
            "import { Command } from 'commander';".to_string(),
            "import chalk from 'chalk';".to_string(),
        ];
        if ir.interactive_enabled() {
            imports.push("import readline from 'node:readline';".to_string());
        }
        imports
    }
}

impl LanguageRenderer for NodeJsRenderer {
    fn language(&self) -> &str {
        "nodejs"
    }

    fn file_extensions(&self) -> BTreeMap<&'static str, &'static str> {
        BTreeMap::from([
            ("command_handler", "js"),
            ("hook_system", "js"),
            ("package_config", "json"),
            ("setup_script", "sh"),
        ])
    }

    fn get_template_context(
        &self,
        ir: &IntermediateRepresentation,
    ) -> Result<RenderContext, GenerationError> {
        let (mut context, _) = base_context(ir, self.language(), HookStyle::Camel, to_camel_case)?;
        let dependencies = npm_dependencies(&ir.dependencies.nodejs);

        context.add_variable("imports", json!(Self::imports(ir)));
        context.add_serialized("npm_dependencies", &dependencies)?;
        context.add_variable(
            "package_config",
            package_config(ir, "./bin/cli.js", &dependencies),
        );
        context.add_variable(
            "js_command_name",
            json!(to_camel_case(&ir.project.command_name)),
        );
        Ok(context)
    }

    fn get_custom_filters(&self) -> FilterTable {
        let mut filters = shared_filters();
        filters.insert("js_type".into(), type_filter(JS_TYPES, JS_FALLBACK_TYPE));
        filters.insert("js_string".into(), string_filter("js_string", escape_js_string));
        filters.insert("js_safe_name".into(), string_filter("js_safe_name", js_safe_name));
        filters.insert("hook_name".into(), string_filter("hook_name", hook_name));
        filters.insert("class_name".into(), string_filter("class_name", to_pascal_case));
        filters
    }

    fn get_output_structure(&self, ir: &IntermediateRepresentation) -> OutputStructure {
        let mut structure = OutputStructure::from([
            ("nodejs/command_handler".to_string(), "cli.js".to_string()),
            ("nodejs/hooks_template".to_string(), "src/hooks.js".to_string()),
            ("nodejs/package_config".to_string(), "package.json".to_string()),
            ("nodejs/bin_entry".to_string(), "bin/cli.js".to_string()),
            ("shared/setup_script".to_string(), "setup.sh".to_string()),
            ("shared/readme".to_string(), "README.md".to_string()),
            ("shared/gitignore".to_string(), ".gitignore".to_string()),
        ]);
        if ir.interactive_enabled() {
            structure.insert(
                "nodejs/interactive_mode".to_string(),
                format!("{}_interactive.js", to_kebab_case(&ir.project.command_name)),
            );
        }
        structure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CliSchema, Command, FeatureToggle, Features, ProjectMetadata};
    use std::collections::HashMap;

    fn ir() -> IntermediateRepresentation {
        IntermediateRepresentation {
            project: ProjectMetadata {
                name: "Web Kit".to_string(),
                package_name: "Web Kit".to_string(),
                command_name: "webkit".to_string(),
                ..Default::default()
            },
            cli: Some(CliSchema {
                root_command: Command {
                    name: "webkit".to_string(),
                    subcommands: vec![Command {
                        name: "serve".to_string(),
                        ..Default::default()
                    }],
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_npm_package_name() {
        assert_eq!(npm_package_name("Web Kit"), "web-kit");
        assert_eq!(npm_package_name("@Scope/Tool"), "@scope/tool");
        assert_eq!(npm_package_name("_private"), "private");
    }

    #[test]
    fn test_npm_dependencies_keep_base_versions() {
        let deps = npm_dependencies(&["chalk".to_string(), "ora".to_string()]);
        assert_eq!(deps["commander"], "^11.1.0");
        assert_eq!(deps["chalk"], "^5.3.0");
        assert_eq!(deps["ora"], "*");
    }

    #[test]
    fn test_context_values() {
        let context = NodeJsRenderer::new().get_template_context(&ir()).unwrap();
        assert_eq!(context.lookup("package_config.name"), Some(&json!("web-kit")));
        assert_eq!(
            context.lookup("package_config.bin.webkit"),
            Some(&json!("./bin/cli.js"))
        );
        assert_eq!(context.get("js_command_name"), Some(&json!("webkit")));
        assert_eq!(
            context.lookup("hook_functions").and_then(|h| h[0].get("name")),
            Some(&json!("onServe"))
        );
    }

    #[test]
    fn test_interactive_mode_adds_output() {
        let renderer = NodeJsRenderer::new();
        assert!(!renderer
            .get_output_structure(&ir())
            .contains_key("nodejs/interactive_mode"));

        let mut ir = ir();
        if let Some(cli) = ir.cli.as_mut() {
            cli.features = Features {
                interactive_mode: FeatureToggle { enabled: true },
                ..Default::default()
            };
        }
        let structure = renderer.get_output_structure(&ir);
        assert_eq!(structure["nodejs/interactive_mode"], "webkit_interactive.js");
        assert_eq!(structure.len(), 8);
    }

    #[test]
    fn test_filters() {
        let filters = NodeJsRenderer::new().get_custom_filters();
        let args = HashMap::new();
        assert_eq!(filters["js_type"](&json!("int"), &args).unwrap(), json!("number"));
        assert_eq!(filters["js_type"](&json!("blob"), &args).unwrap(), json!("string"));
        assert_eq!(filters["js_safe_name"](&json!("new"), &args).unwrap(), json!("_new"));
        assert_eq!(
            filters["hook_name"](&json!("build-all"), &args).unwrap(),
            json!("onBuildAll")
        );
        assert_eq!(
            filters["js_string"](&json!("it's \"x\""), &args).unwrap(),
            json!("\"it's \\\"x\\\"\"")
        );
    }
}
