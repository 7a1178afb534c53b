//! Render context - the per-run mapping handed to templates

use serde::Serialize;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::generation::GenerationError;

/// Variables visible to a template during one generation run.
///
/// Rebuilt from the IR on every run and never cached across runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    variables: JsonMap<String, JsonValue>,
}

impl RenderContext {
    /// Create a new render context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable to the render context, replacing any previous value
    pub fn add_variable(&mut self, key: &str, value: JsonValue) {
        self.variables.insert(key.to_string(), value);
    }

    /// Serialize `value` and add it under `key`
    pub fn add_serialized<T: Serialize>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), GenerationError> {
        self.add_variable(key, serde_json::to_value(value)?);
        Ok(())
    }

    /// Check if a variable exists
    pub fn has_variable(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.variables.get(key)
    }

    /// Follow a dotted path such as `project.name`
    pub fn lookup(&self, path: &str) -> Option<&JsonValue> {
        let mut segments = path.split('.');
        let mut current = self.variables.get(segments.next()?)?;
        for segment in segments {
            current = current.get(segment)?;
        }
        Some(current)
    }

    pub fn variables(&self) -> &JsonMap<String, JsonValue> {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Convert to a [`tera::Context`] for rendering
    pub fn to_tera_context(&self) -> tera::Context {
        let mut context = tera::Context::new();
        for (key, value) in &self.variables {
            context.insert(key.as_str(), value);
        }
        context
    }
}
