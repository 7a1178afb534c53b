//! Built-in language renderers

pub mod nodejs;
pub mod python;
pub mod rust;
pub mod shared;
pub mod typescript;

pub use nodejs::NodeJsRenderer;
pub use python::PythonRenderer;
pub use rust::RustRenderer;
pub use typescript::TypeScriptRenderer;

use crate::generation::{Language, LanguageRenderer};

/// Select the built-in renderer for a language
pub fn renderer_for(language: Language) -> Box<dyn LanguageRenderer> {
    match language {
        Language::Python => Box::new(PythonRenderer::new()),
        Language::NodeJs => Box::new(NodeJsRenderer::new()),
        Language::TypeScript => Box::new(TypeScriptRenderer::new()),
        Language::Rust => Box::new(RustRenderer::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_tags_match_language() {
        for language in Language::all() {
            assert_eq!(renderer_for(language).language(), language.as_str());
        }
    }
}
