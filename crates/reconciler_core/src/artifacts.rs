//! File-backed Terraform artifacts.
//!
//! Each resource gets one `.tf` file in the output directory, named
//! `<identity>_repository.tf` or `<identity>_team.tf`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use template_engine::{artifact_file_name, ArtifactTemplates};
use tracing::debug;

use crate::errors::{ArtifactError, ReconcilerResult};
use crate::processor::{ArtifactGenerator, ArtifactRemover, Removal};
use crate::repository::Repository;
use crate::resource::{ManagedResource, ResourceKind};
use crate::team::Team;

#[cfg(test)]
#[path = "artifacts_tests.rs"]
mod tests;

/// Renders artifacts with Handlebars and writes them under `output_dir`.
#[derive(Debug)]
pub struct TerraformArtifactWriter {
    templates: ArtifactTemplates,
    output_dir: PathBuf,
}

impl TerraformArtifactWriter {
    pub fn new(templates: ArtifactTemplates, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates,
            output_dir: output_dir.into(),
        }
    }

    /// Compiles the templates, with overrides from `template_dir` when given.
    pub fn load(template_dir: Option<&Path>, output_dir: impl Into<PathBuf>) -> ReconcilerResult<Self> {
        let templates = ArtifactTemplates::load(template_dir)?;
        Ok(Self::new(templates, output_dir))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the artifact for `identity` of the given kind.
    pub fn artifact_path(&self, kind: ResourceKind, identity: &str) -> Result<PathBuf, ArtifactError> {
        let file_name = artifact_file_name(identity, kind.artifact_suffix()).map_err(|e| {
            ArtifactError::InvalidName {
                kind,
                identity: identity.to_string(),
                source: e,
            }
        })?;
        Ok(self.output_dir.join(file_name))
    }

    fn write<R: ManagedResource>(
        &self,
        resource: &R,
        render: impl Fn(&ArtifactTemplates, &Value) -> Result<String, template_engine::Error>,
    ) -> Result<PathBuf, ArtifactError> {
        let identity = resource.identity();
        let path = self.artifact_path(R::KIND, identity)?;

        let attributes = Value::Object(resource.to_attributes());
        let content = render(&self.templates, &attributes).map_err(|e| ArtifactError::Render {
            kind: R::KIND,
            identity: identity.to_string(),
            source: e,
        })?;

        fs::create_dir_all(&self.output_dir).map_err(|e| io_error(&self.output_dir, e))?;
        fs::write(&path, content).map_err(|e| io_error(&path, e))?;

        debug!(kind = %R::KIND, identity, path = %path.display(), "Wrote artifact");
        Ok(path)
    }
}

impl ArtifactGenerator for TerraformArtifactWriter {
    fn generate_repository(&self, repository: &Repository) -> Result<PathBuf, ArtifactError> {
        self.write(repository, ArtifactTemplates::render_repository)
    }

    fn generate_team(&self, team: &Team) -> Result<PathBuf, ArtifactError> {
        self.write(team, ArtifactTemplates::render_team)
    }
}

impl ArtifactRemover for TerraformArtifactWriter {
    fn remove(&self, kind: ResourceKind, identity: &str) -> Result<Removal, ArtifactError> {
        let path = self.artifact_path(kind, identity)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(Removal::Removed(path)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Removal::NotFound(path)),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

fn io_error(path: &Path, source: io::Error) -> ArtifactError {
    ArtifactError::Io {
        path: path.display().to_string(),
        source,
    }
}
