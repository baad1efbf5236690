//! # Handlebars Template Engine
//!
//! This module renders Terraform artifacts with the Handlebars templating
//! engine. Output is HCL rather than HTML, so values are escaped for HCL
//! string literals instead of HTML entities.
//!
//! ## Custom Helpers
//!
//! - `tf_label`: turn any text into a valid Terraform resource label
//! - `local_part`: the part of an e-mail style username before `@`
//!
//! ## Examples
//!
//! ```rust
//! # use template_engine::{HandlebarsTemplateEngine, TemplateContext};
//! # use serde_json::json;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut engine = HandlebarsTemplateEngine::new()?;
//! engine.register_custom_helpers()?;
//! engine.register_template("address", "github_team.{{tf_label team_name}}")?;
//!
//! let context = TemplateContext::new(json!({"team_name": "Platform Team"}));
//! let result = engine.render("address", &context)?;
//! assert_eq!(result, "github_team.Platform_Team");
//! # Ok(())
//! # }
//! ```

use handlebars::{
    Context, Handlebars, Helper, HelperDef, Output, RenderContext, RenderError, RenderErrorReason,
};
use serde_json::Value;
use thiserror::Error;

#[cfg(test)]
#[path = "handlebars_tests.rs"]
mod handlebars_tests;

// ================================
// Custom Handlebars Helpers
// ================================

/// Reads the first parameter of `helper` as a string.
fn string_param<'a>(h: &'a Helper<'_>, helper: &'static str) -> Result<&'a str, RenderError> {
    let param = h
        .param(0)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex(helper, 0))?;

    param.value().as_str().ok_or_else(|| {
        RenderErrorReason::Other(format!("{helper} helper requires a string parameter")).into()
    })
}

/// Helper to convert text into a Terraform resource label.
///
/// Labels may contain letters, digits, underscores and dashes and must not
/// start with a digit; every other character becomes `_`.
struct TfLabelHelper;

impl HelperDef for TfLabelHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> Result<(), RenderError> {
        let param = string_param(h, "tf_label")?;

        out.write(&terraform_label(param))?;
        Ok(())
    }
}

/// Helper to extract the local part of an e-mail style username.
struct LocalPartHelper;

impl HelperDef for LocalPartHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> Result<(), RenderError> {
        let param = string_param(h, "local_part")?;

        out.write(local_part(param))?;
        Ok(())
    }
}

/// Converts arbitrary text into a Terraform resource label.
pub fn terraform_label(text: &str) -> String {
    let mut label: String = text
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if label.is_empty() || label.starts_with(|c: char| c.is_ascii_digit()) {
        label.insert(0, '_');
    }

    label
}

/// Returns the text before the first `@`, or the whole text without one.
pub fn local_part(username: &str) -> &str {
    username.split('@').next().unwrap_or(username)
}

/// Escapes a rendered value for use inside an HCL quoted string.
///
/// Template sequences (`${`, `%{`) are doubled so Terraform treats them as
/// literal text.
pub fn hcl_escape(data: &str) -> String {
    let mut escaped = String::with_capacity(data.len());
    let mut chars = data.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                escaped.push(c);
                escaped.push(c);
            }
            c => escaped.push(c),
        }
    }

    escaped
}

/// Errors that can occur during Handlebars template processing.
#[derive(Error, Debug)]
pub enum HandlebarsError {
    /// Template compilation failed due to syntax errors.
    ///
    /// Raised for unclosed blocks, malformed expressions and similar
    /// problems in a template source.
    #[error("Template compilation failed: {message}")]
    CompilationError {
        /// Detailed error message from the Handlebars parser
        message: String,
    },

    /// Template rendering failed during execution.
    #[error("Template rendering failed: {message}")]
    RenderError {
        /// Detailed error message from the Handlebars renderer
        message: String,
    },

    /// A file path produced for an artifact is invalid or unsafe.
    #[error("Invalid file path generated from template: {path} - {reason}")]
    InvalidPath {
        /// The problematic path
        path: String,
        /// Specific reason why the path is invalid
        reason: String,
    },

    /// A variable referenced by the template is not in the context.
    #[error("Variable validation failed: {variable} - {reason}")]
    VariableValidation {
        /// Name of the variable that failed validation
        variable: String,
        /// Specific validation failure reason
        reason: String,
    },

    /// No template has been registered under the requested name.
    #[error("Template not registered: {name}")]
    TemplateNotRegistered {
        /// The requested template name
        name: String,
    },

    /// Template processing exceeded resource limits.
    #[error("Resource limit exceeded: {limit_type} - {message}")]
    ResourceLimit {
        /// Type of resource limit that was exceeded
        limit_type: String,
        /// Detailed message about the limit violation
        message: String,
    },
}

/// Variables for rendering a template.
///
/// Variables are stored as JSON values, which lets an artifact template walk
/// nested structures such as a team's member list.
#[derive(Debug, Clone)]
pub struct TemplateContext {
    /// All variables available for template rendering.
    pub variables: Value,
}

/// Configuration for template rendering behavior.
#[derive(Debug, Clone)]
pub struct TemplateRenderConfig {
    /// Whether to fail on undefined variables (true) or render them as
    /// empty strings (false).
    ///
    /// **Default**: `true`
    pub strict_variables: bool,

    /// Maximum size of template content in bytes.
    ///
    /// **Default**: 1MB (1,048,576 bytes)
    pub max_template_size: usize,
}

/// Handlebars template engine with HCL escaping and artifact helpers.
///
/// Templates are registered once under a name with
/// [`register_template`](Self::register_template) and rendered repeatedly
/// with [`render`](Self::render).
pub struct HandlebarsTemplateEngine {
    handlebars: Handlebars<'static>,
    config: TemplateRenderConfig,
}

impl std::fmt::Debug for HandlebarsTemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlebarsTemplateEngine")
            .field("templates", &self.handlebars.get_templates().keys())
            .field("config", &self.config)
            .finish()
    }
}

impl TemplateContext {
    /// Creates a new template context.
    pub fn new(variables: Value) -> Self {
        Self { variables }
    }
}

impl Default for TemplateRenderConfig {
    fn default() -> Self {
        Self {
            strict_variables: true,
            max_template_size: 1_048_576, // 1MB
        }
    }
}

impl HandlebarsTemplateEngine {
    /// Creates a new Handlebars template engine with default configuration.
    ///
    /// Custom helpers must be registered separately using
    /// `register_custom_helpers()`.
    pub fn new() -> Result<Self, HandlebarsError> {
        Self::with_config(TemplateRenderConfig::default())
    }

    /// Creates a new engine with custom configuration.
    pub fn with_config(config: TemplateRenderConfig) -> Result<Self, HandlebarsError> {
        let mut handlebars = Handlebars::new();

        handlebars.set_strict_mode(config.strict_variables);
        handlebars.register_escape_fn(hcl_escape);

        Ok(Self { handlebars, config })
    }

    /// Registers the artifact helpers: `tf_label` and `local_part`.
    pub fn register_custom_helpers(&mut self) -> Result<(), HandlebarsError> {
        self.handlebars
            .register_helper("tf_label", Box::new(TfLabelHelper));
        self.handlebars
            .register_helper("local_part", Box::new(LocalPartHelper));

        Ok(())
    }

    /// Compiles and registers a template under `name`, replacing any
    /// template previously registered with that name.
    ///
    /// # Errors
    ///
    /// - `HandlebarsError::ResourceLimit`: the source exceeds the size limit
    /// - `HandlebarsError::CompilationError`: the source is not valid Handlebars
    pub fn register_template(&mut self, name: &str, source: &str) -> Result<(), HandlebarsError> {
        self.check_template_size(source)?;

        self.handlebars
            .register_template_string(name, source)
            .map_err(|e| HandlebarsError::CompilationError {
                message: format!("{name}: {e}"),
            })
    }

    /// Returns `true` if a template is registered under `name`.
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }

    /// Renders a previously registered template.
    ///
    /// # Errors
    ///
    /// - `HandlebarsError::TemplateNotRegistered`: no template named `name`
    /// - `HandlebarsError::VariableValidation`: a variable is missing in strict mode
    /// - `HandlebarsError::RenderError`: a helper or the renderer failed
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String, HandlebarsError> {
        if !self.handlebars.has_template(name) {
            return Err(HandlebarsError::TemplateNotRegistered {
                name: name.to_string(),
            });
        }

        self.handlebars
            .render(name, &context.variables)
            .map_err(categorize_render_error)
    }

    fn check_template_size(&self, template: &str) -> Result<(), HandlebarsError> {
        if template.len() > self.config.max_template_size {
            return Err(HandlebarsError::ResourceLimit {
                limit_type: "template_size".to_string(),
                message: format!(
                    "Template size {} bytes exceeds limit of {} bytes",
                    template.len(),
                    self.config.max_template_size
                ),
            });
        }

        Ok(())
    }
}

fn categorize_render_error(e: RenderError) -> HandlebarsError {
    let err_msg = e.to_string();

    // Missing variable errors in strict mode
    if err_msg.contains("Variable") && err_msg.contains("not found") {
        HandlebarsError::VariableValidation {
            variable: "unknown".to_string(),
            reason: err_msg,
        }
    } else if err_msg.contains("parse")
        || err_msg.contains("Parse")
        || err_msg.contains("syntax")
        || err_msg.contains("invalid")
        || err_msg.contains("Invalid")
        || err_msg.contains("unclosed")
        || err_msg.contains("Unclosed")
    {
        HandlebarsError::CompilationError { message: err_msg }
    } else {
        HandlebarsError::RenderError { message: err_msg }
    }
}

/// Validates that a generated artifact file name is safe to join onto the
/// output directory.
///
/// # Validation Rules
///
/// - Not empty, not `.` or `..`
/// - No directory traversal sequences (`..`)
/// - No path separators, so the file stays directly inside the output directory
/// - No Windows drive letters or null bytes
/// - At most 255 characters
pub fn validate_file_path(path: &str) -> Result<(), HandlebarsError> {
    let invalid = |reason: &str| HandlebarsError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if path.is_empty() {
        return Err(invalid("Path cannot be empty"));
    }

    if path == "." || path == ".." {
        return Err(invalid("Path cannot be '.' or '..'"));
    }

    if path.contains("..") {
        return Err(invalid("Path contains directory traversal sequence '..'"));
    }

    if path.contains('/') || path.contains('\\') {
        return Err(invalid("Path separators are not allowed"));
    }

    if path.len() >= 2 && path.chars().nth(1) == Some(':') {
        return Err(invalid("Windows drive letters are not allowed"));
    }

    if path.contains('\0') {
        return Err(invalid("Path contains null byte"));
    }

    if cfg!(windows) {
        let invalid_chars = ['<', '>', '|', '?', '*', '"'];
        if let Some(ch) = invalid_chars.iter().find(|ch| path.contains(**ch)) {
            return Err(invalid(&format!("Path contains invalid character '{}'", ch)));
        }
    }

    if path.len() > 255 {
        return Err(invalid("Path exceeds maximum length of 255 characters"));
    }

    Ok(())
}
