//! Repository fetching into `<project>/.mcp/servers`.

mod fetcher;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::source::RepoReference;

pub use fetcher::GitFetcher;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to create {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to run git {args}: {source}")]
    Spawn {
        args: String,
        #[source]
        source: std::io::Error,
    },
    #[error("git {args} failed:\n{output}")]
    Git { args: String, output: String },
    #[error("Server '{name}' is not installed (looked in {})", path.display())]
    NotInstalled { name: String, path: PathBuf },
    #[error("Cannot derive a directory name from '{reference}'")]
    InvalidReference { reference: String },
}

impl FetchError {
    pub fn output(&self) -> Option<&str> {
        match self {
            FetchError::Git { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Source of local repository checkouts for the install pipeline.
pub trait RepoFetcher: Send + Sync + fmt::Debug {
    /// Clone `reference` (or reuse an existing checkout) and return its path.
    fn fetch(&self, reference: &RepoReference) -> Result<PathBuf, FetchError>;

    /// Bring an existing checkout up to date.
    fn pull(&self, repo: &Path) -> Result<(), FetchError>;
}
