//! Tests for the Handlebars template engine functionality.

use crate::handlebars_engine::*;
use serde_json::json;

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> HandlebarsTemplateEngine {
        let mut engine = HandlebarsTemplateEngine::new().expect("engine");
        engine.register_custom_helpers().expect("helpers");
        engine
    }

    fn render_source(
        mut engine: HandlebarsTemplateEngine,
        source: &str,
        context: &TemplateContext,
    ) -> Result<String, HandlebarsError> {
        engine.register_template("inline", source)?;
        engine.render("inline", context)
    }

    // ================================
    // Template Context Tests
    // ================================

    #[test]
    fn test_template_context_new() {
        let variables = json!({"repository_name": "test-project"});

        let context = TemplateContext::new(variables.clone());
        assert_eq!(context.variables, variables);
    }

    // ================================
    // Rendering Tests
    // ================================

    #[test]
    fn test_render_simple_variable() {
        let context = TemplateContext::new(json!({"name": "repo1"}));

        let result = render_source(engine(), "name = \"{{name}}\"", &context).unwrap();

        assert_eq!(result, "name = \"repo1\"");
    }

    #[test]
    fn test_values_are_hcl_escaped_not_html_escaped() {
        let context = TemplateContext::new(json!({
            "description": "Say \"hi\" & <wave>\nthen ${leave}"
        }));

        let result = render_source(engine(), "\"{{description}}\"", &context).unwrap();

        assert_eq!(
            result,
            "\"Say \\\"hi\\\" & <wave>\\nthen $${leave}\""
        );
    }

    #[test]
    fn test_strict_mode_rejects_missing_variable() {
        let context = TemplateContext::new(json!({}));

        let result = render_source(engine(), "{{missing}}", &context);

        assert!(result.is_err());
    }

    #[test]
    fn test_non_strict_mode_renders_missing_as_empty() {
        let config = TemplateRenderConfig {
            strict_variables: false,
            ..Default::default()
        };
        let engine = HandlebarsTemplateEngine::with_config(config).unwrap();
        let context = TemplateContext::new(json!({}));

        let result = render_source(engine, "[{{missing}}]", &context).unwrap();

        assert_eq!(result, "[]");
    }

    #[test]
    fn test_template_size_limit() {
        let config = TemplateRenderConfig {
            max_template_size: 8,
            ..Default::default()
        };
        let mut engine = HandlebarsTemplateEngine::with_config(config).unwrap();

        let result = engine.register_template("too_big", "0123456789");

        assert!(matches!(result, Err(HandlebarsError::ResourceLimit { .. })));
    }

    #[test]
    fn test_register_and_render_named_template() {
        let mut engine = engine();
        engine
            .register_template("greeting", "hello {{local_part name}}")
            .unwrap();

        assert!(engine.has_template("greeting"));
        let context = TemplateContext::new(json!({"name": "world@example.com"}));
        assert_eq!(engine.render("greeting", &context).unwrap(), "hello world");
    }

    #[test]
    fn test_render_unregistered_template() {
        let context = TemplateContext::new(json!({}));

        let result = engine().render("nope", &context);

        assert!(matches!(
            result,
            Err(HandlebarsError::TemplateNotRegistered { ref name }) if name == "nope"
        ));
    }

    #[test]
    fn test_register_invalid_template() {
        let mut engine = engine();

        let result = engine.register_template("broken", "{{#if open}}never closed");

        assert!(matches!(result, Err(HandlebarsError::CompilationError { .. })));
    }

    // ================================
    // Helper Tests
    // ================================

    #[test]
    fn test_tf_label_helper() {
        let context = TemplateContext::new(json!({"name": "my team.v2"}));

        let result = render_source(engine(), "{{tf_label name}}", &context).unwrap();

        assert_eq!(result, "my_team_v2");
    }

    #[test]
    fn test_local_part_helper_with_subexpression() {
        let context = TemplateContext::new(json!({"username": "john.doe@example.com"}));

        let result =
            render_source(engine(), "{{tf_label (local_part username)}}", &context).unwrap();

        assert_eq!(result, "john_doe");
    }

    #[test]
    fn test_helpers_reject_missing_parameter() {
        let context = TemplateContext::new(json!({}));

        let result = render_source(engine(), "{{tf_label}}", &context);

        assert!(matches!(result, Err(HandlebarsError::RenderError { .. })));
    }

    #[test]
    fn test_helpers_reject_non_string_parameter() {
        let context = TemplateContext::new(json!({"count": 3}));

        let result = render_source(engine(), "{{local_part count}}", &context);

        match result {
            Err(HandlebarsError::RenderError { message }) => {
                assert!(message.contains("local_part helper requires a string parameter"));
            }
            other => panic!("expected a render error, got {other:?}"),
        }
    }

    // ================================
    // Free Function Tests
    // ================================

    #[test]
    fn test_terraform_label() {
        assert_eq!(terraform_label("repo-1"), "repo-1");
        assert_eq!(terraform_label("repo.one"), "repo_one");
        assert_eq!(terraform_label("1st-repo"), "_1st-repo");
        assert_eq!(terraform_label(""), "_");
    }

    #[test]
    fn test_local_part() {
        assert_eq!(local_part("user@example.com"), "user");
        assert_eq!(local_part("plain-user"), "plain-user");
    }

    #[test]
    fn test_hcl_escape_leaves_plain_text_alone() {
        assert_eq!(hcl_escape("plain text 100%"), "plain text 100%");
        assert_eq!(hcl_escape("a\\b"), "a\\\\b");
        assert_eq!(hcl_escape("%{if}"), "%%{if}");
    }

    #[test]
    fn test_validate_file_path_accepts_plain_names() {
        assert!(validate_file_path("repo1_repository.tf").is_ok());
        assert!(validate_file_path("team.with.dots_team.tf").is_ok());
    }

    #[test]
    fn test_validate_file_path_rejects_unsafe_names() {
        assert!(validate_file_path("").is_err());
        assert!(validate_file_path("..").is_err());
        assert!(validate_file_path("../etc_repository.tf").is_err());
        assert!(validate_file_path("nested/repo_repository.tf").is_err());
        assert!(validate_file_path("C:repo_repository.tf").is_err());
        assert!(validate_file_path("bad\0name").is_err());
        assert!(validate_file_path(&"a".repeat(256)).is_err());
    }
}
