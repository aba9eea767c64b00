//! Build detection: classify a repository and derive its [`LaunchSpec`].
//!
//! Detection walks an ordered registry of [`BuildStrategy`] objects and
//! builds with the first one whose `detect` matches. Default order:
//!
//! | Priority | Strategy | Marker |
//! |----------|----------|--------|
//! | 1 | manifest | `mcp.json` |
//! | 2 | node | `package.json` |
//! | 3 | python | `pyproject.toml` / `requirements.txt` |
//! | 4 | go | `go.mod` |
//!
//! Only the manifest strategy reports required environment variables; the
//! heuristic strategies always produce an empty `required_env`.

mod golang;
mod identity;
mod manifest;
mod node;
mod python;
mod spec;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::shell::{ShellError, ShellRunner};

pub use golang::GoStrategy;
pub use identity::{FALLBACK_SERVER_NAME, server_identity};
pub use manifest::{MANIFEST_FILE, Manifest, ManifestStrategy};
pub use node::{NodeStrategy, PackageManager};
pub use python::{PYTHON_ENTRY_CANDIDATES, PythonStrategy};
pub use spec::LaunchSpec;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(
        "Could not detect project type in {} (no mcp.json, package.json, pyproject.toml, requirements.txt, or go.mod)",
        path.display()
    )]
    Detection { path: PathBuf },
    #[error("Build step failed: {0}")]
    Command(#[from] ShellError),
    #[error("Could not find a {strategy} entry point in {} (tried {})", path.display(), tried.join(", "))]
    EntryPoint {
        strategy: &'static str,
        path: PathBuf,
        tried: Vec<String>,
    },
    #[error("Invalid {}: {message}", path.display())]
    Manifest { path: PathBuf, message: String },
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    /// Captured process output for failed shell steps.
    pub fn output(&self) -> Option<&str> {
        match self {
            BuildError::Command(err) => err.output(),
            _ => None,
        }
    }
}

/// One way of turning a repository into a runnable server.
pub trait BuildStrategy: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Cheap marker-file check; must not run commands.
    fn detect(&self, repo: &Path) -> bool;

    fn build(&self, repo: &Path, shell: &dyn ShellRunner) -> Result<LaunchSpec, BuildError>;
}

/// Ordered strategy registry plus the shell it builds with.
#[derive(Debug, Clone)]
pub struct BuildDetector {
    shell: Arc<dyn ShellRunner>,
    strategies: Arc<Vec<Box<dyn BuildStrategy>>>,
}

impl BuildDetector {
    pub fn with_default_strategies(shell: Arc<dyn ShellRunner>) -> Self {
        Self::with_strategies(shell, default_strategies())
    }

    pub fn with_strategies(
        shell: Arc<dyn ShellRunner>,
        strategies: Vec<Box<dyn BuildStrategy>>,
    ) -> Self {
        Self {
            shell,
            strategies: Arc::new(strategies),
        }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// The strategy that would handle `repo`, if any.
    pub fn select(&self, repo: &Path) -> Option<&dyn BuildStrategy> {
        self.strategies
            .iter()
            .find(|strategy| strategy.detect(repo))
            .map(|strategy| strategy.as_ref())
    }

    /// Detect the project type of `repo` and build it.
    pub fn detect_and_build(&self, repo: &Path) -> Result<LaunchSpec, BuildError> {
        let repo = std::path::absolute(repo).map_err(|source| BuildError::Io {
            path: repo.to_path_buf(),
            source,
        })?;

        let strategy = self
            .select(&repo)
            .ok_or_else(|| BuildError::Detection { path: repo.clone() })?;
        tracing::info!(strategy = strategy.name(), repo = %repo.display(), "building server");

        let spec = strategy.build(&repo, self.shell.as_ref())?;
        tracing::info!(command = %spec.command(), args = ?spec.args(), "resolved launch spec");
        Ok(spec)
    }
}

pub fn default_strategies() -> Vec<Box<dyn BuildStrategy>> {
    vec![
        Box::new(ManifestStrategy),
        Box::new(NodeStrategy),
        Box::new(PythonStrategy),
        Box::new(GoStrategy),
    ]
}

/// Quote a path for interpolation into a POSIX shell command line.
pub(crate) fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-+:=@%,".contains(c));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "'\\''"))
    }
}

pub(crate) fn display_path(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
