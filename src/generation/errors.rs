//! Error types for the generation domain

use thiserror::Error;

use crate::infrastructure::templates::ComponentError;

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum GenerationError {
    /// No renderer registered for the requested language tag
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The IR lacks identifiers the renderer needs to build a context
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The component could not be fetched from the store
    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    /// The component text does not parse as a template
    #[error("Template syntax error in '{component}': {message}")]
    TemplateSyntax { component: String, message: String },

    /// The template parsed but failed while rendering
    #[error("Render error in '{component}': {message}")]
    RenderError { component: String, message: String },

    #[error("Invalid renderer registration: {0}")]
    InvalidRegistration(String),

    #[error("Invalid language: {0}")]
    InvalidLanguage(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl GenerationError {
    /// Whether this error ends the whole run rather than a single component
    pub fn is_run_aborting(&self) -> bool {
        matches!(
            self,
            GenerationError::UnsupportedLanguage(_) | GenerationError::MalformedInput(_)
        )
    }
}

/// Render a tera error together with its source chain.
///
/// Tera keeps the useful detail (line, column, missing variable) in the sources.
pub(crate) fn describe_tera_error(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = std::error::Error::source(inner);
    }
    message
}
