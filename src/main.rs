//! cliweave CLI entrypoint
//! Parses command-line arguments and dispatches to the generation engine.
#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cliweave::generation::{GenerationEngine, GenerationReport, GenerationStatus, Language};
use cliweave::infrastructure::output::{FileSystemOutputWriter, OutputWriter};
use cliweave::infrastructure::templates::ComponentStore;
use cliweave::{GeneratorConfig, IntermediateRepresentation};

#[derive(Parser)]
#[command(name = "cliweave")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ./cliweave.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate CLI packages from an IR document
    Generate {
        /// IR document (JSON or YAML)
        #[arg(long)]
        ir: PathBuf,
        /// Target languages (python, nodejs, typescript, rust)
        #[arg(short, long = "language", required = true, num_args = 1..)]
        languages: Vec<String>,
        /// Output directory; each language is written to its own subdirectory
        /// when more than one is requested
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Component directory
        #[arg(long)]
        components_dir: Option<PathBuf>,
        /// Report what would be written without touching the filesystem
        #[arg(long)]
        dry_run: bool,
        /// Overwrite existing files without keeping a .bak copy
        #[arg(long)]
        no_backup: bool,
    },
    /// Inspect the component store
    Components {
        /// Component directory
        #[arg(long, global = true)]
        components_dir: Option<PathBuf>,
        #[command(subcommand)]
        action: ComponentActions,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum ComponentActions {
    /// List every component name
    List,
    /// Syntax-check every component
    Validate,
    /// Show the declared dependencies of one component
    Deps {
        /// Component name, e.g. rust/main
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config =
        GeneratorConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Generate {
            ir,
            languages,
            output_dir,
            components_dir,
            dry_run,
            no_backup,
        } => {
            if let Some(dir) = components_dir {
                config.components_dir = Some(dir);
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if no_backup {
                config.backup_existing = false;
            }
            run_generate(&config, &ir, &languages, dry_run).await?
        }
        Commands::Components {
            components_dir,
            action,
        } => {
            if let Some(dir) = components_dir {
                config.components_dir = Some(dir);
            }
            run_components(&config, action)?
        }
    }
    Ok(())
}

/// Canonical tag for built-in aliases; unknown tags pass through untouched
fn language_tag(raw: &str) -> String {
    Language::from_str(raw)
        .map(|language| language.as_str().to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Generate every requested language in parallel, one engine and store each
async fn run_generate(
    config: &GeneratorConfig,
    ir_path: &Path,
    languages: &[String],
    dry_run: bool,
) -> anyhow::Result<()> {
    let ir = IntermediateRepresentation::from_path(ir_path)
        .with_context(|| format!("Failed to load IR from {}", ir_path.display()))?;
    let ir = Arc::new(ir);
    let store_config = config.store_config();
    let split_output = languages.len() > 1;

    info!(
        ir = %ir_path.display(),
        components_dir = %store_config.components_dir.display(),
        languages = ?languages,
        "Starting generation"
    );

    let mut tasks = Vec::new();
    for raw in languages {
        let tag = language_tag(raw);
        let output_root = if split_output {
            config.output_dir.join(&tag)
        } else {
            config.output_dir.clone()
        };
        let ir = Arc::clone(&ir);
        let store_config = store_config.clone();

        tasks.push(tokio::task::spawn_blocking(move || {
            let mut engine =
                GenerationEngine::with_default_renderers(ComponentStore::new(store_config));
            engine.generate(&ir, &tag, &output_root)
        }));
    }

    let writer = FileSystemOutputWriter::new()
        .with_backup(config.backup_existing)
        .with_executable_extensions(config.executable_extensions.clone());

    let mut incomplete = Vec::new();
    for (raw, task) in languages.iter().zip(tasks) {
        let report = match task.await.context("Generation task panicked")? {
            Ok(report) => report,
            Err(e) => {
                warn!(language = %raw, error = %e, "Generation rejected");
                println!("✗ {raw}: {e}");
                incomplete.push(raw.clone());
                continue;
            }
        };

        print_report(&report);
        if report.status() != GenerationStatus::Completed {
            incomplete.push(report.language.clone());
        }

        if dry_run || report.files.is_empty() {
            continue;
        }
        let summary = writer
            .write_files(&report.files)
            .await
            .with_context(|| format!("Failed to write {} output", report.language))?;
        info!(
            language = %report.language,
            written = summary.written.len(),
            unchanged = summary.unchanged.len(),
            backed_up = summary.backed_up.len(),
            "Wrote generated files"
        );
    }

    if !incomplete.is_empty() {
        anyhow::bail!("Generation incomplete for: {}", incomplete.join(", "));
    }
    Ok(())
}

fn print_report(report: &GenerationReport) {
    match report.status() {
        GenerationStatus::Aborted => {
            println!(
                "✗ {}: aborted ({})",
                report.language,
                report.aborted.as_deref().unwrap_or("unknown error")
            );
            return;
        }
        GenerationStatus::Completed => println!(
            "✅ {}: {} of {} files generated",
            report.language,
            report.files.len(),
            report.attempted
        ),
        GenerationStatus::PartiallyFailed => println!(
            "⚠ {}: {} of {} files generated",
            report.language,
            report.files.len(),
            report.attempted
        ),
    }

    for path in report.files.keys() {
        println!("  + {}", path.display());
    }
    for failure in &report.failures {
        println!(
            "  ✗ {} -> {}: {}",
            failure.component, failure.path, failure.reason
        );
    }
}

fn run_components(config: &GeneratorConfig, action: ComponentActions) -> anyhow::Result<()> {
    let mut store = ComponentStore::new(config.store_config());

    match action {
        ComponentActions::List => {
            let names = store.list_components();
            if names.is_empty() {
                println!(
                    "No components found in {}",
                    store.components_dir().display()
                );
            }
            for name in names {
                println!("{name}");
            }
        }
        ComponentActions::Validate => {
            store.load_components().with_context(|| {
                format!(
                    "Failed to load components from {}",
                    store.components_dir().display()
                )
            })?;
            let results = store.validate_all_components();
            let invalid: Vec<_> = results.iter().filter(|(_, errors)| !errors.is_empty()).collect();

            for (name, errors) in &invalid {
                println!("✗ {name}");
                for error in errors.iter() {
                    println!("    {error}");
                }
            }
            println!(
                "{} components checked, {} invalid",
                results.len(),
                invalid.len()
            );
            if !invalid.is_empty() {
                anyhow::bail!("{} component(s) failed validation", invalid.len());
            }
        }
        ComponentActions::Deps { name } => {
            let dependencies = store
                .get_dependencies(&name)
                .with_context(|| format!("Failed to read component '{name}'"))?;
            if dependencies.is_empty() {
                println!("{name} declares no dependencies");
            }
            for dependency in dependencies {
                println!("{dependency}");
            }
        }
    }
    Ok(())
}
