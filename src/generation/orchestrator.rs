//! Generation orchestration - coordinates one generation run

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::generation::{
    ComponentFailure, GenerationError, GenerationReport, Language, LanguageRenderer,
    OutputFileMap, RenderContext,
};
use crate::infrastructure::generation::renderer_for;
use crate::infrastructure::templates::ComponentStore;
use crate::ir::IntermediateRepresentation;

/// Drives rendering of every output component for a language.
///
/// Each engine owns its store and its renderer table; nothing is shared between
/// engines, so independent engines can run on separate threads.
pub struct GenerationEngine {
    store: ComponentStore,
    renderers: HashMap<String, Box<dyn LanguageRenderer>>,
}

impl GenerationEngine {
    /// Engine with an empty renderer table
    pub fn new(store: ComponentStore) -> Self {
        Self {
            store,
            renderers: HashMap::new(),
        }
    }

    /// Engine with the four built-in renderers registered
    pub fn with_default_renderers(store: ComponentStore) -> Self {
        let mut engine = Self::new(store);
        for language in Language::all() {
            engine
                .renderers
                .insert(language.as_str().to_string(), renderer_for(language));
        }
        engine
    }

    /// Register (or replace) the renderer for a language tag
    pub fn register_renderer(
        &mut self,
        language: impl Into<String>,
        renderer: Box<dyn LanguageRenderer>,
    ) -> Result<(), GenerationError> {
        let language = language.into();
        if language.trim().is_empty() {
            return Err(GenerationError::InvalidRegistration(
                "language tag must not be empty".to_string(),
            ));
        }
        if self.renderers.insert(language.clone(), renderer).is_some() {
            debug!(language = %language, "Replaced registered renderer");
        }
        Ok(())
    }

    /// Registered language tags, sorted
    pub fn supported_languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = self.renderers.keys().cloned().collect();
        languages.sort();
        languages
    }

    pub fn store(&self) -> &ComponentStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ComponentStore {
        &mut self.store
    }

    /// Run one generation.
    ///
    /// Only an unregistered language is an `Err`. A context that cannot be built
    /// aborts the run with an empty file map; every other failure skips just the
    /// component it concerns and is recorded in the report.
    pub fn generate(
        &mut self,
        ir: &IntermediateRepresentation,
        language: &str,
        output_root: &Path,
    ) -> Result<GenerationReport, GenerationError> {
        let renderer = self
            .renderers
            .get(language)
            .ok_or_else(|| GenerationError::UnsupportedLanguage(language.to_string()))?;

        let mut report = GenerationReport::new(language);

        let context = match renderer.get_template_context(ir) {
            Ok(context) => context,
            Err(e) => {
                warn!(language = %language, error = %e, "Aborting generation: context could not be built");
                report.aborted = Some(e.to_string());
                return Ok(report);
            }
        };

        let structure = renderer.get_output_structure(ir);
        report.attempted = structure.len();
        debug!(language = %language, components = structure.len(), "Rendering output structure");

        let outcomes: Vec<Result<(PathBuf, String), ComponentFailure>> = structure
            .iter()
            .map(|(component, relative)| {
                render_entry(&mut self.store, &**renderer, &context, component)
                    .map(|text| (output_root.join(relative), text))
                    .map_err(|e| ComponentFailure {
                        component: component.clone(),
                        path: relative.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect();

        for outcome in outcomes {
            match outcome {
                Ok((path, text)) => {
                    report.files.insert(path, text);
                }
                Err(failure) => {
                    warn!(
                        language = %language,
                        component = %failure.component,
                        path = %failure.path,
                        error = %failure.reason,
                        "Skipping component"
                    );
                    report.failures.push(failure);
                }
            }
        }

        info!(
            language = %language,
            rendered = report.files.len(),
            failed = report.failures.len(),
            "Generation finished"
        );
        Ok(report)
    }

    /// Like [`generate`](Self::generate) but returns only the file map
    pub fn generate_files(
        &mut self,
        ir: &IntermediateRepresentation,
        language: &str,
        output_root: &Path,
    ) -> Result<OutputFileMap, GenerationError> {
        Ok(self.generate(ir, language, output_root)?.files)
    }
}

fn render_entry(
    store: &mut ComponentStore,
    renderer: &dyn LanguageRenderer,
    context: &RenderContext,
    component: &str,
) -> Result<String, GenerationError> {
    let template = store.get_component(component)?;
    let dependencies = store.get_dependency_sources(component)?;
    renderer.render_component_with_dependencies(component, &template, &dependencies, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{FilterTable, OutputStructure, filters::shared_filters};
    use crate::ir::{CliSchema, Command, ProjectMetadata};
    use serde_json::json;
    use std::collections::BTreeMap;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    /// Minimal renderer with a fixed two-entry layout
    struct DemoRenderer;

    impl LanguageRenderer for DemoRenderer {
        fn language(&self) -> &str {
            "demo"
        }

        fn file_extensions(&self) -> BTreeMap<&'static str, &'static str> {
            BTreeMap::from([("cli", "ext")])
        }

        fn get_template_context(
            &self,
            ir: &IntermediateRepresentation,
        ) -> Result<RenderContext, GenerationError> {
            if ir.project.name.is_empty() {
                return Err(GenerationError::MalformedInput("project.name".into()));
            }
            let mut context = RenderContext::new();
            context.add_variable("project", json!({"name": ir.project.name}));
            Ok(context)
        }

        fn get_custom_filters(&self) -> FilterTable {
            shared_filters()
        }

        fn get_output_structure(&self, _ir: &IntermediateRepresentation) -> OutputStructure {
            OutputStructure::from([
                ("cli".to_string(), "cli.ext".to_string()),
                ("extra".to_string(), "extra.ext".to_string()),
            ])
        }
    }

    fn ir(name: &str) -> IntermediateRepresentation {
        IntermediateRepresentation {
            project: ProjectMetadata {
                name: name.to_string(),
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

    fn engine_with(dir: &TempDir) -> GenerationEngine {
        let mut engine = GenerationEngine::new(ComponentStore::from_dir(dir.path()));
        engine
            .register_renderer("demo", Box::new(DemoRenderer))
            .unwrap();
        engine
    }

    #[test]
    fn test_unsupported_language_is_error() {
        let dir = TempDir::new().unwrap();
        let mut engine = engine_with(&dir);
        let result = engine.generate(&ir("demo"), "cobol", dir.path());
        assert!(matches!(result, Err(GenerationError::UnsupportedLanguage(_))));
    }

    #[test]
    fn test_missing_components_yield_empty_map() {
        let dir = TempDir::new().unwrap();
        let mut engine = engine_with(&dir);

        let report = engine.generate(&ir("demo"), "demo", Path::new("/out")).unwrap();
        assert!(report.files.is_empty());
        assert!(!report.is_aborted());
        assert_eq!(report.attempted, 2);
        assert_eq!(report.failures.len(), 2);
    }

    #[test]
    fn test_render_failure_is_isolated() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("cli.tera"), "Hello {{ project.name }}").unwrap();
        std::fs::write(dir.path().join("extra.tera"), "{{ missing.value }}").unwrap();
        let mut engine = engine_with(&dir);

        let report = engine.generate(&ir("demo"), "demo", Path::new("/out")).unwrap();
        assert_eq!(
            report.files.get(Path::new("/out/cli.ext")).map(String::as_str),
            Some("Hello demo")
        );
        assert_eq!(report.failed_components(), vec!["extra"]);
        assert_eq!(report.status(), crate::generation::GenerationStatus::PartiallyFailed);
    }

    #[test]
    fn test_malformed_input_aborts_run() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("cli.tera"), "static").unwrap();
        let mut engine = engine_with(&dir);

        let report = engine.generate(&ir(""), "demo", dir.path()).unwrap();
        assert!(report.is_aborted());
        assert!(report.files.is_empty());
        assert_eq!(report.attempted, 0);
    }

    #[test]
    fn test_register_renderer_rejects_empty_tag() {
        let dir = TempDir::new().unwrap();
        let mut engine = GenerationEngine::new(ComponentStore::from_dir(dir.path()));
        assert!(matches!(
            engine.register_renderer("  ", Box::new(DemoRenderer)),
            Err(GenerationError::InvalidRegistration(_))
        ));
    }

    #[test]
    fn test_default_renderers_registered() {
        let dir = TempDir::new().unwrap();
        let engine = GenerationEngine::with_default_renderers(ComponentStore::from_dir(dir.path()));
        assert_eq!(
            engine.supported_languages(),
            vec!["nodejs", "python", "rust", "typescript"]
        );
    }

    #[test]
    #[traced_test]
    fn test_skipped_components_are_logged() {
        let dir = TempDir::new().unwrap();
        let mut engine = engine_with(&dir);

        engine.generate(&ir("demo"), "demo", dir.path()).unwrap();
        assert!(logs_contain("Skipping component"));
        assert!(logs_contain("Component not found: cli"));
    }
}
