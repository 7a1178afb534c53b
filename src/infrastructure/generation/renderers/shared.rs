//! Context pieces every language renderer shares

use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::generation::utils::{to_camel_case, to_pascal_case, to_snake_case};
use crate::generation::{GenerationError, RenderContext};
use crate::ir::{Argument, CliOption, Command, IntermediateRepresentation};

/// How a language spells hook function names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStyle {
    /// `on_deploy_all`
    Snake,
    /// `onDeployAll`
    Camel,
}

impl HookStyle {
    /// Hook name for a command path (`["deploy", "all"]`) or an explicit stem
    pub fn hook_name(&self, stem: &str) -> String {
        match self {
            HookStyle::Snake => format!("on_{}", to_snake_case(stem)),
            HookStyle::Camel => format!("on{}", to_pascal_case(stem)),
        }
    }
}

/// One command from the tree, flattened for templates
#[derive(Debug, Clone, Serialize)]
pub struct CommandEntry {
    pub name: String,
    /// Names from the first subcommand level down to this command
    pub path: Vec<String>,
    /// Space-separated invocation, root command included
    pub full_name: String,
    pub depth: usize,
    /// `path` joined with `_`, or the root name for a lone root command
    pub stem: String,
    /// Stem of the enclosing group; `None` for the root and first-level commands
    pub parent_stem: Option<String>,
    /// Variable holding this command in generated commander code
    pub var_name: String,
    /// Variable of the command this one is attached to
    pub parent_var: String,
    pub description: String,
    pub hook_name: String,
    pub arguments: Vec<Argument>,
    pub options: Vec<CliOption>,
    pub aliases: Vec<String>,
    pub has_subcommands: bool,
}

/// Hook function declaration handed to hook templates
#[derive(Debug, Clone, Serialize)]
pub struct HookFunction {
    pub name: String,
    pub command: String,
    pub description: String,
    pub arguments: Vec<String>,
    pub options: Vec<String>,
}

/// Walk the command tree depth-first.
///
/// The root command is listed at depth 0 only when it has no subcommands;
/// otherwise every subcommand at any depth is listed.
pub fn flatten_commands(root: &Command, style: HookStyle) -> Vec<CommandEntry> {
    let mut entries = Vec::new();
    if root.subcommands.is_empty() {
        entries.push(entry_for(root, Vec::new(), &root.name, style));
    } else {
        for sub in &root.subcommands {
            collect(sub, Vec::new(), &root.name, style, &mut entries);
        }
    }
    entries
}

fn collect(
    command: &Command,
    parent_path: Vec<String>,
    root_name: &str,
    style: HookStyle,
    entries: &mut Vec<CommandEntry>,
) {
    let mut path = parent_path;
    path.push(command.name.clone());
    entries.push(entry_for(command, path.clone(), root_name, style));
    for sub in &command.subcommands {
        collect(sub, path.clone(), root_name, style, entries);
    }
}

const ROOT_VAR: &str = "program";

fn command_var(stem: &str) -> String {
    format!("{}Command", to_camel_case(stem))
}

fn entry_for(command: &Command, path: Vec<String>, root_name: &str, style: HookStyle) -> CommandEntry {
    let stem = if path.is_empty() {
        command.name.clone()
    } else {
        path.join("_")
    };
    let parent_stem = (path.len() > 1).then(|| path[..path.len() - 1].join("_"));
    let hook_stem = match &command.hook_name {
        Some(explicit) if !explicit.trim().is_empty() => explicit.as_str(),
        _ => stem.as_str(),
    };
    let full_name = std::iter::once(root_name.to_string())
        .chain(path.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ");

    CommandEntry {
        name: command.name.clone(),
        depth: path.len(),
        full_name,
        var_name: if path.is_empty() {
            ROOT_VAR.to_string()
        } else {
            command_var(&stem)
        },
        parent_var: parent_stem
            .as_deref()
            .map(command_var)
            .unwrap_or_else(|| ROOT_VAR.to_string()),
        hook_name: style.hook_name(hook_stem),
        path,
        stem,
        parent_stem,
        description: command.description.clone(),
        arguments: command.arguments.clone(),
        options: command.options.clone(),
        aliases: command.aliases.clone(),
        has_subcommands: !command.subcommands.is_empty(),
    }
}

/// Hook declarations for every command, parameter names in the language's case
pub fn hook_functions(
    commands: &[CommandEntry],
    parameter_case: fn(&str) -> String,
) -> Vec<HookFunction> {
    commands
        .iter()
        .map(|entry| HookFunction {
            name: entry.hook_name.clone(),
            command: entry.full_name.clone(),
            description: entry.description.clone(),
            arguments: entry.arguments.iter().map(|a| parameter_case(&a.name)).collect(),
            options: entry.options.iter().map(|o| parameter_case(&o.name)).collect(),
        })
        .collect()
}

/// Validate the IR and build the part of the context every language shares.
///
/// Adds `language`, `project`, `cli`, `dependencies`, `installation`, `metadata`,
/// `commands` and `hook_functions`.
pub fn base_context(
    ir: &IntermediateRepresentation,
    language: &str,
    style: HookStyle,
    parameter_case: fn(&str) -> String,
) -> Result<(RenderContext, Vec<CommandEntry>), GenerationError> {
    ir.validate_required()?;

    let root = ir.root_command();
    let commands = flatten_commands(&root, style);

    let mut context = RenderContext::new();
    context.add_variable("language", json!(language));
    context.add_serialized("project", &ir.project)?;
    context.add_serialized("cli", &ir.cli)?;
    context.add_serialized("dependencies", &ir.dependencies)?;
    context.add_serialized("installation", &ir.installation)?;
    context.add_variable("version", json!(ir.version_or_default()));
    context.add_variable(
        "metadata",
        json!({
            "timestamp": Utc::now().to_rfc3339(),
            "generator_version": env!("CARGO_PKG_VERSION"),
            "package_name": ir.project.package_name,
            "command_name": ir.project.command_name,
            "extra": ir.metadata,
        }),
    );
    context.add_variable("interactive_mode", json!(ir.interactive_enabled()));
    context.add_serialized("hook_functions", &hook_functions(&commands, parameter_case))?;
    context.add_serialized("commands", &commands)?;

    Ok((context, commands))
}
