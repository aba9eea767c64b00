//! Process execution primitives.
//!
//! - [`ShellRunner`] runs a command line through the operator's login shell and
//!   is what build strategies use.
//! - [`CommandRunner`] runs a program with an argument vector, no shell, and is
//!   what host registration and git use.

mod command;

use std::fmt;
use std::path::Path;
use std::process::Command;

use thiserror::Error;

pub use command::{CommandOutput, CommandRunner, SystemCommandRunner, combine_output};

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Failed to start shell '{shell}' for `{command}`: {source}")]
    Spawn {
        shell: String,
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}:\n{output}")]
    Failed {
        command: String,
        status: String,
        output: String,
    },
}

impl ShellError {
    /// Combined stdout/stderr captured from the failing command, if any.
    pub fn output(&self) -> Option<&str> {
        match self {
            ShellError::Failed { output, .. } => Some(output),
            ShellError::Spawn { .. } => None,
        }
    }
}

/// How spawned shells see the parent environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvPolicy {
    /// Every variable of the invoking process is passed through unfiltered.
    /// Build tools rely on `PATH`, version-manager shims and proxy settings.
    #[default]
    InheritAll,
}

/// Runs shell command lines for build strategies.
pub trait ShellRunner: Send + Sync + fmt::Debug {
    /// Run `command_line` with `dir` as working directory.
    ///
    /// Returns the combined output on success. An empty command line is a
    /// no-op.
    fn run(&self, dir: &Path, command_line: &str) -> Result<String, ShellError>;

    /// Whether `program` resolves on the operator's `PATH`.
    fn has_program(&self, program: &str) -> bool;

    fn env_policy(&self) -> EnvPolicy {
        EnvPolicy::InheritAll
    }
}

/// Shell runner backed by the operator's preferred shell.
///
/// Auto-detection prefers `zsh`, then `bash`, both as login shells so that
/// profile-managed tooling (nvm, pyenv, asdf) is on `PATH`, then plain `sh`.
#[derive(Debug, Clone)]
pub struct LoginShellRunner {
    shell: String,
    flags: Vec<&'static str>,
    env_policy: EnvPolicy,
}

impl LoginShellRunner {
    pub fn detect() -> Self {
        for candidate in ["zsh", "bash"] {
            if which::which(candidate).is_ok() {
                return Self::with_shell(candidate);
            }
        }
        Self::with_shell("sh")
    }

    /// Use a specific shell, by name or path.
    pub fn with_shell(shell: &str) -> Self {
        let name = Path::new(shell)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| shell.to_string());
        // Login flag only; `-i` would drag job control into a non-tty child.
        let flags = match name.as_str() {
            "zsh" | "bash" => vec!["-l", "-c"],
            _ => vec!["-c"],
        };
        Self {
            shell: shell.to_string(),
            flags,
            env_policy: EnvPolicy::InheritAll,
        }
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }
}

impl ShellRunner for LoginShellRunner {
    fn run(&self, dir: &Path, command_line: &str) -> Result<String, ShellError> {
        if command_line.trim().is_empty() {
            return Ok(String::new());
        }
        tracing::debug!(shell = %self.shell, dir = %dir.display(), "running `{}`", command_line);

        let mut cmd = Command::new(&self.shell);
        cmd.args(&self.flags).arg(command_line).current_dir(dir);
        match self.env_policy {
            EnvPolicy::InheritAll => {
                cmd.envs(std::env::vars_os());
            }
        }

        let output = cmd.output().map_err(|source| ShellError::Spawn {
            shell: self.shell.clone(),
            command: command_line.to_string(),
            source,
        })?;
        let combined = combine_output(&output.stdout, &output.stderr);
        if !output.status.success() {
            return Err(ShellError::Failed {
                command: command_line.to_string(),
                status: output.status.to_string(),
                output: combined,
            });
        }
        Ok(combined)
    }

    fn has_program(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    fn env_policy(&self) -> EnvPolicy {
        self.env_policy
    }
}
