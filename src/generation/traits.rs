//! Port interfaces for the generation domain

use std::collections::BTreeMap;

use crate::generation::{FilterTable, GenerationError, OutputStructure, RenderContext, sanitizers};
use crate::infrastructure::generation::render_template;
use crate::ir::IntermediateRepresentation;

/// Per-language transformation from IR to rendered source files.
///
/// A new target language is added by implementing this trait and handing an
/// instance to [`GenerationEngine::register_renderer`](crate::generation::GenerationEngine::register_renderer).
/// Implementations hold no per-run state, so one instance can serve any number
/// of runs.
pub trait LanguageRenderer: Send + Sync {
    /// Language tag, e.g. `rust`
    fn language(&self) -> &str;

    /// Component kind to the file extension used for that kind of output
    fn file_extensions(&self) -> BTreeMap<&'static str, &'static str>;

    /// Build the render context for one run.
    ///
    /// Fails with [`GenerationError::MalformedInput`] when required IR fields are absent.
    fn get_template_context(
        &self,
        ir: &IntermediateRepresentation,
    ) -> Result<RenderContext, GenerationError>;

    /// Filters made available to every component this renderer renders
    fn get_custom_filters(&self) -> FilterTable;

    /// Render one component.
    ///
    /// Syntax errors surface as [`GenerationError::TemplateSyntax`] and failures
    /// during evaluation as [`GenerationError::RenderError`]; no partial text is returned.
    fn render_component(
        &self,
        component_name: &str,
        template: &str,
        context: &RenderContext,
    ) -> Result<String, GenerationError> {
        self.render_component_with_dependencies(
            component_name,
            template,
            &BTreeMap::new(),
            context,
        )
    }

    /// Render one component with the components it declares loaded beside it,
    /// so it can `include` or `extend` them by name.
    fn render_component_with_dependencies(
        &self,
        component_name: &str,
        template: &str,
        dependencies: &BTreeMap<String, String>,
        context: &RenderContext,
    ) -> Result<String, GenerationError> {
        let rendered = render_template(
            component_name,
            template,
            dependencies,
            context,
            &self.get_custom_filters(),
        )?;
        Ok(self.post_process(&rendered))
    }

    /// Cleanup applied to each successfully rendered component
    fn post_process(&self, rendered: &str) -> String {
        sanitizers::post_process(rendered)
    }

    /// Component name to relative output path for this IR.
    ///
    /// Only components listed here are rendered by the engine.
    fn get_output_structure(&self, ir: &IntermediateRepresentation) -> OutputStructure;
}
