//! Explicit `mcp.json` manifest strategy.
//!
//! The manifest is an escape hatch: whatever it says is returned verbatim,
//! without resolving paths or checking that the run command exists.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use super::{BuildError, BuildStrategy, LaunchSpec};
use crate::shell::ShellRunner;

pub const MANIFEST_FILE: &str = "mcp.json";

/// Repository-level `mcp.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Informational project type ("node", "python", "go", ...).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, alias = "buildCmd")]
    pub build_command: Option<String>,
    #[serde(default, alias = "runCmd", deserialize_with = "null_as_default")]
    pub run_command: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub args: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_env: Vec<String>,
}

/// `null` reads as the field's empty value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let bytes = std::fs::read(path).map_err(|source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: Manifest =
            serde_json::from_slice(&bytes).map_err(|err| BuildError::Manifest {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        if manifest.run_command.trim().is_empty() {
            return Err(BuildError::Manifest {
                path: path.to_path_buf(),
                message: "'runCommand' is required".to_string(),
            });
        }
        Ok(manifest)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestStrategy;

impl BuildStrategy for ManifestStrategy {
    fn name(&self) -> &'static str {
        "manifest"
    }

    fn detect(&self, repo: &Path) -> bool {
        repo.join(MANIFEST_FILE).is_file()
    }

    fn build(&self, repo: &Path, shell: &dyn ShellRunner) -> Result<LaunchSpec, BuildError> {
        let manifest = Manifest::load(&repo.join(MANIFEST_FILE))?;
        if let Some(kind) = &manifest.kind {
            tracing::debug!(kind = %kind, "manifest declares project type");
        }

        if let Some(build) = manifest.build_command.as_deref()
            && !build.trim().is_empty()
        {
            shell.run(repo, build)?;
        }

        Ok(LaunchSpec::new(
            manifest.run_command,
            manifest.args,
            manifest.required_env,
        ))
    }
}
