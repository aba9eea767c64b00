use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{FetchError, RepoFetcher};
use crate::shell::CommandRunner;
use crate::source::RepoReference;

/// Clones with the `git` CLI into a flat servers directory.
#[derive(Debug, Clone)]
pub struct GitFetcher {
    servers_dir: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl GitFetcher {
    pub fn new(servers_dir: PathBuf, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            servers_dir,
            runner,
        }
    }

    pub fn servers_dir(&self) -> &Path {
        &self.servers_dir
    }

    /// Checkout directory of an installed server.
    pub fn server_path(&self, name: &str) -> Result<PathBuf, FetchError> {
        let path = self.servers_dir.join(name);
        if name.is_empty() || !path.is_dir() {
            return Err(FetchError::NotInstalled {
                name: name.to_string(),
                path,
            });
        }
        Ok(path)
    }

    /// Installed server names, sorted. A missing servers directory is empty.
    pub fn list_servers(&self) -> Result<Vec<String>, FetchError> {
        let entries = match std::fs::read_dir(&self.servers_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(FetchError::Io {
                    path: self.servers_dir.clone(),
                    source,
                });
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .filter(|name| !name.starts_with('.'))
            .collect();
        names.sort();
        Ok(names)
    }

    fn run_git(&self, cwd: &Path, args: &[String]) -> Result<(), FetchError> {
        let joined = args.join(" ");
        tracing::debug!(cwd = %cwd.display(), "git {}", joined);
        let output = self
            .runner
            .run("git", args, cwd)
            .map_err(|source| FetchError::Spawn {
                args: joined.clone(),
                source,
            })?;
        if !output.success {
            return Err(FetchError::Git {
                args: joined,
                output: output.combined.trim().to_string(),
            });
        }
        Ok(())
    }
}

impl RepoFetcher for GitFetcher {
    fn fetch(&self, reference: &RepoReference) -> Result<PathBuf, FetchError> {
        let name = reference.repo_name();
        if name.is_empty() || name == "." || name == ".." {
            return Err(FetchError::InvalidReference {
                reference: reference.raw().to_string(),
            });
        }

        std::fs::create_dir_all(&self.servers_dir).map_err(|source| FetchError::Io {
            path: self.servers_dir.clone(),
            source,
        })?;

        let target = self.servers_dir.join(&name);
        if target.exists() {
            tracing::info!(path = %target.display(), "reusing existing checkout");
            return Ok(target);
        }

        tracing::info!(url = reference.url(), "cloning {}", name);
        let args = vec![
            "clone".to_string(),
            "--depth".to_string(),
            "1".to_string(),
            reference.url().to_string(),
            target.to_string_lossy().to_string(),
        ];
        self.run_git(&self.servers_dir, &args)?;
        Ok(target)
    }

    fn pull(&self, repo: &Path) -> Result<(), FetchError> {
        tracing::info!(path = %repo.display(), "pulling latest changes");
        self.run_git(repo, &["pull".to_string()])
    }
}
