//! Tera-based component rendering

use std::collections::{BTreeMap, HashMap};
use tera::Tera;

use crate::generation::errors::describe_tera_error;
use crate::generation::{FilterTable, GenerationError, RenderContext};

/// Render one component's text with `filters` registered.
///
/// `dependencies` maps component names to their text; they are loaded next to
/// the component so it can `include` or `extend` them by name.
///
/// Each call uses a fresh [`Tera`] instance, so filters and templates from one
/// component never leak into another. Autoescaping is off: output is source
/// code, not HTML.
pub fn render_template(
    component_name: &str,
    template: &str,
    dependencies: &BTreeMap<String, String>,
    context: &RenderContext,
    filters: &FilterTable,
) -> Result<String, GenerationError> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);

    for (name, filter) in filters {
        let filter = filter.clone();
        tera.register_filter(
            name,
            move |value: &serde_json::Value, args: &HashMap<String, serde_json::Value>| {
                filter(value, args)
            },
        );
    }

    let templates = dependencies
        .iter()
        .filter(|(name, _)| name.as_str() != component_name)
        .map(|(name, content)| (name.as_str(), content.as_str()))
        .chain(std::iter::once((component_name, template)));

    tera.add_raw_templates(templates)
        .map_err(|e| GenerationError::TemplateSyntax {
            component: component_name.to_string(),
            message: describe_tera_error(&e),
        })?;

    tera.render(component_name, &context.to_tera_context())
        .map_err(|e| GenerationError::RenderError {
            component: component_name.to_string(),
            message: describe_tera_error(&e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::filters::shared_filters;
    use serde_json::json;

    fn context() -> RenderContext {
        let mut context = RenderContext::new();
        context.add_variable("project", json!({"name": "demo-tool"}));
        context.add_variable("items", json!(["a", "b"]));
        context
    }

    #[test]
    fn test_render_with_filters() {
        let rendered = render_template(
            "greeting",
            "struct {{ project.name | pascal_case }};{% for i in items %} {{ i }}{% endfor %}",
            &BTreeMap::new(),
            &context(),
            &shared_filters(),
        )
        .unwrap();
        assert_eq!(rendered, "struct DemoTool; a b");
    }

    #[test]
    fn test_no_html_escaping() {
        let mut context = RenderContext::new();
        context.add_variable("code", json!("a < b && \"c\""));
        let rendered =
            render_template("code", "{{ code }}", &BTreeMap::new(), &context, &FilterTable::new()).unwrap();
        assert_eq!(rendered, "a < b && \"c\"");
    }

    #[test]
    fn test_syntax_error_is_distinct() {
        let result = render_template("broken", "{% if %}", &BTreeMap::new(), &context(), &shared_filters());
        match result {
            Err(GenerationError::TemplateSyntax { component, .. }) => {
                assert_eq!(component, "broken")
            }
            other => panic!("Expected TemplateSyntax, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_variable_is_render_error() {
        let result = render_template("cli", "{{ nope.value }}", &BTreeMap::new(), &context(), &shared_filters());
        assert!(matches!(result, Err(GenerationError::RenderError { .. })));
    }

    #[test]
    fn test_unknown_filter_is_render_error() {
        let result = render_template(
            "cli",
            "{{ project.name | not_a_filter }}",
            &BTreeMap::new(),
            &context(),
            &FilterTable::new(),
        );
        assert!(matches!(result, Err(GenerationError::RenderError { .. })));
    }

    fn notice() -> BTreeMap<String, String> {
        BTreeMap::from([(
            "shared/notice".to_string(),
            "Made for {{ project.name | kebab_case }}".to_string(),
        )])
    }

    #[test]
    fn test_component_includes_dependency() {
        let rendered = render_template(
            "python/cli",
            "# {% include \"shared/notice\" %}\nimport click",
            &notice(),
            &context(),
            &shared_filters(),
        )
        .unwrap();
        assert_eq!(rendered, "# Made for demo-tool\nimport click");
    }

    #[test]
    fn test_component_extends_dependency() {
        let dependencies = BTreeMap::from([(
            "shared/base".to_string(),
            "[{% block body %}{% endblock body %}]".to_string(),
        )]);
        let rendered = render_template(
            "child",
            "{% extends \"shared/base\" %}{% block body %}{{ project.name }}{% endblock body %}",
            &dependencies,
            &context(),
            &shared_filters(),
        )
        .unwrap();
        assert_eq!(rendered, "[demo-tool]");
    }

    #[test]
    fn test_undeclared_include_is_render_error() {
        let result = render_template(
            "cli",
            "{% include \"shared/notice\" %}",
            &BTreeMap::new(),
            &context(),
            &shared_filters(),
        );
        assert!(matches!(result, Err(GenerationError::RenderError { .. })));
    }
}
