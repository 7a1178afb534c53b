//! Generation infrastructure implementations

pub mod renderers;
pub mod template_renderer;

pub use renderers::{
    NodeJsRenderer, PythonRenderer, RustRenderer, TypeScriptRenderer, renderer_for,
};
pub use template_renderer::render_template;
