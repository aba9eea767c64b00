use std::path::Path;

use super::{BuildError, BuildStrategy, LaunchSpec, display_path};
use crate::shell::ShellRunner;

#[cfg(windows)]
const BINARY_NAME: &str = "mcp-server.exe";
#[cfg(not(windows))]
const BINARY_NAME: &str = "mcp-server";

/// Compiled-binary strategy for Go modules.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoStrategy;

impl BuildStrategy for GoStrategy {
    fn name(&self) -> &'static str {
        "go"
    }

    fn detect(&self, repo: &Path) -> bool {
        repo.join("go.mod").is_file()
    }

    fn build(&self, repo: &Path, shell: &dyn ShellRunner) -> Result<LaunchSpec, BuildError> {
        shell.run(repo, &format!("go build -o {BINARY_NAME} ."))?;
        Ok(LaunchSpec::without_env(
            display_path(&repo.join(BINARY_NAME)),
            Vec::new(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn detects_go_mod() {
        let temp = TempDir::new().unwrap();
        assert!(!GoStrategy.detect(temp.path()));
        std::fs::write(temp.path().join("go.mod"), "module example.com/weather\n").unwrap();
        assert!(GoStrategy.detect(temp.path()));
    }
}
