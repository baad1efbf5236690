//! Template Engine for the Terraform reconciler
//!
//! This crate renders the per-resource Terraform artifacts. It exposes a
//! Handlebars engine configured for HCL output and the compiled
//! repository/team templates used by the artifact writer.

pub mod artifact_templates;
mod errors;
pub mod handlebars_engine;

pub use artifact_templates::{
    artifact_file_name, ArtifactTemplates, ARTIFACT_EXTENSION, REPOSITORY_TEMPLATE, TEAM_TEMPLATE,
    TEMPLATE_EXTENSION,
};
pub use errors::Error;
pub use handlebars_engine::{
    hcl_escape, local_part, terraform_label, validate_file_path, HandlebarsError,
    HandlebarsTemplateEngine, TemplateContext, TemplateRenderConfig,
};
