use std::path::{Path, PathBuf};

use super::{BuildError, BuildStrategy, LaunchSpec, display_path, shell_quote};
use crate::shell::ShellRunner;

const VENV_DIR: &str = ".venv";
const REQUIREMENTS_FILE: &str = "requirements.txt";
const PYPROJECT_FILE: &str = "pyproject.toml";

/// Entry scripts tried in order, relative to the repository root.
pub const PYTHON_ENTRY_CANDIDATES: [&str; 5] = [
    "main.py",
    "server.py",
    "app.py",
    "src/main.py",
    "src/server.py",
];

const VENV_COMMANDS: [&str; 2] = ["python3 -m venv .venv", "python -m venv .venv"];

/// Python strategy: private virtualenv, dependency install, entry script.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonStrategy;

impl BuildStrategy for PythonStrategy {
    fn name(&self) -> &'static str {
        "python"
    }

    fn detect(&self, repo: &Path) -> bool {
        repo.join(PYPROJECT_FILE).is_file() || repo.join(REQUIREMENTS_FILE).is_file()
    }

    fn build(&self, repo: &Path, shell: &dyn ShellRunner) -> Result<LaunchSpec, BuildError> {
        create_venv(repo, shell)?;

        let venv = repo.join(VENV_DIR);
        let pip = display_path(&venv_tool(&venv, "pip"));
        let python = venv_tool(&venv, "python");

        if repo.join(REQUIREMENTS_FILE).exists() {
            shell.run(
                repo,
                &format!("{} install -r {}", shell_quote(&pip), REQUIREMENTS_FILE),
            )?;
        } else if repo.join(PYPROJECT_FILE).exists() {
            shell.run(repo, &format!("{} install .", shell_quote(&pip)))?;
        }

        let entry = PYTHON_ENTRY_CANDIDATES
            .iter()
            .map(|candidate| repo.join(candidate))
            .find(|path| path.exists())
            .ok_or_else(|| BuildError::EntryPoint {
                strategy: "python",
                path: repo.to_path_buf(),
                tried: PYTHON_ENTRY_CANDIDATES.iter().map(|c| c.to_string()).collect(),
            })?;

        Ok(LaunchSpec::without_env(
            display_path(&python),
            vec![display_path(&entry)],
        ))
    }
}

/// Try `python3` first, then `python`; the last failure is reported.
fn create_venv(repo: &Path, shell: &dyn ShellRunner) -> Result<(), BuildError> {
    let mut last_err = None;
    for command in VENV_COMMANDS {
        match shell.run(repo, command) {
            Ok(_) => return Ok(()),
            Err(err) => {
                tracing::debug!("`{}` failed, trying next interpreter", command);
                last_err = Some(err);
            }
        }
    }
    match last_err {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn venv_tool(venv: &Path, tool: &str) -> PathBuf {
    if cfg!(windows) {
        venv.join("Scripts").join(format!("{tool}.exe"))
    } else {
        venv.join("bin").join(tool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn detects_either_marker() {
        let temp = TempDir::new().unwrap();
        assert!(!PythonStrategy.detect(temp.path()));

        std::fs::write(temp.path().join(REQUIREMENTS_FILE), "mcp\n").unwrap();
        assert!(PythonStrategy.detect(temp.path()));

        let other = TempDir::new().unwrap();
        std::fs::write(other.path().join(PYPROJECT_FILE), "[project]\n").unwrap();
        assert!(PythonStrategy.detect(other.path()));
    }

    #[cfg(unix)]
    #[test]
    fn venv_tools_live_in_bin() {
        let venv = Path::new("/srv/app/.venv");
        assert_eq!(venv_tool(venv, "python"), Path::new("/srv/app/.venv/bin/python"));
    }
}
