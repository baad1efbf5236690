//! Artifact templates for the two managed resource kinds.
//!
//! Each kind has one Handlebars template. The built-in versions are compiled
//! into the binary; a template directory may override either of them with a
//! `repository.tf.hbs` or `team.tf.hbs` file.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::errors::Error;
use crate::handlebars_engine::{validate_file_path, HandlebarsTemplateEngine, TemplateContext};

#[cfg(test)]
#[path = "artifact_templates_tests.rs"]
mod tests;

/// Template name (and file stem) for repository artifacts.
pub const REPOSITORY_TEMPLATE: &str = "repository";

/// Template name (and file stem) for team artifacts.
pub const TEAM_TEMPLATE: &str = "team";

/// Extension of template files in a template directory.
pub const TEMPLATE_EXTENSION: &str = "tf.hbs";

/// Extension of generated artifacts.
pub const ARTIFACT_EXTENSION: &str = "tf";

const BUILTIN_REPOSITORY_TEMPLATE: &str = include_str!("../templates/repository.tf.hbs");
const BUILTIN_TEAM_TEMPLATE: &str = include_str!("../templates/team.tf.hbs");

/// Compiled repository and team templates, ready to render.
#[derive(Debug)]
pub struct ArtifactTemplates {
    engine: HandlebarsTemplateEngine,
}

impl ArtifactTemplates {
    /// Compiles the built-in templates.
    pub fn builtin() -> Result<Self, Error> {
        let mut engine = HandlebarsTemplateEngine::new()?;
        engine.register_custom_helpers()?;
        engine.register_template(REPOSITORY_TEMPLATE, BUILTIN_REPOSITORY_TEMPLATE)?;
        engine.register_template(TEAM_TEMPLATE, BUILTIN_TEAM_TEMPLATE)?;

        Ok(Self { engine })
    }

    /// Compiles the templates, preferring files found in `template_dir`.
    ///
    /// A missing directory or missing file falls back to the built-in
    /// template. A file that exists but cannot be read or compiled is an
    /// error.
    pub fn load(template_dir: Option<&Path>) -> Result<Self, Error> {
        let mut templates = Self::builtin()?;

        let Some(dir) = template_dir else {
            return Ok(templates);
        };

        for name in [REPOSITORY_TEMPLATE, TEAM_TEMPLATE] {
            let path = dir.join(format!("{name}.{TEMPLATE_EXTENSION}"));
            if !path.is_file() {
                debug!(template = name, path = %path.display(), "Using built-in template");
                continue;
            }

            let source = fs::read_to_string(&path).map_err(|e| Error::TemplateRead {
                path: path.display().to_string(),
                source: e,
            })?;
            templates.engine.register_template(name, &source)?;
            info!(template = name, path = %path.display(), "Loaded template override");
        }

        Ok(templates)
    }

    /// Renders the repository artifact for a repository attribute map.
    pub fn render_repository(&self, attributes: &Value) -> Result<String, Error> {
        self.render(REPOSITORY_TEMPLATE, attributes)
    }

    /// Renders the team artifact for a team attribute map.
    pub fn render_team(&self, attributes: &Value) -> Result<String, Error> {
        self.render(TEAM_TEMPLATE, attributes)
    }

    fn render(&self, name: &str, attributes: &Value) -> Result<String, Error> {
        let context = TemplateContext::new(attributes.clone());
        Ok(self.engine.render(name, &context)?)
    }
}

/// File name of the artifact for `identity` of the given kind,
/// e.g. `repo1_repository.tf`.
///
/// # Errors
///
/// Returns `Error::Handlebars(InvalidPath)` if the identity would produce a
/// name that escapes the output directory.
pub fn artifact_file_name(identity: &str, kind_suffix: &str) -> Result<String, Error> {
    let name = format!("{identity}_{kind_suffix}.{ARTIFACT_EXTENSION}");
    validate_file_path(&name)?;
    Ok(name)
}
