//! Direct program execution with captured output.

use std::fmt;
use std::path::Path;
use std::process::Command;

/// Result of running an external program to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    /// stdout followed by stderr.
    pub combined: String,
}

impl CommandOutput {
    pub fn ok(combined: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            combined: combined.into(),
        }
    }

    pub fn failed(code: i32, combined: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            combined: combined.into(),
        }
    }
}

/// Runs a program with an argument vector.
pub trait CommandRunner: Send + Sync + fmt::Debug {
    /// Spawn failures are `Err`; a non-zero exit is an `Ok` with
    /// `success == false`.
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> std::io::Result<CommandOutput>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> std::io::Result<CommandOutput> {
        tracing::debug!(cwd = %cwd.display(), "running {} {}", program, args.join(" "));
        let output = Command::new(program).args(args).current_dir(cwd).output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            combined: combine_output(&output.stdout, &output.stderr),
        })
    }
}

/// Join stdout and stderr into one lossy string.
pub fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    let stderr = String::from_utf8_lossy(stderr);
    if !stderr.is_empty() {
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&stderr);
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_output_separates_streams() {
        assert_eq!(combine_output(b"out", b"err"), "out\nerr");
        assert_eq!(combine_output(b"out\n", b"err"), "out\nerr");
        assert_eq!(combine_output(b"", b"err"), "err");
        assert_eq!(combine_output(b"out", b""), "out");
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_reports_exit_status() {
        let dir = std::env::temp_dir();
        let runner = SystemCommandRunner;

        let ok = runner.run("true", &[], &dir).unwrap();
        let failed = runner.run("false", &[], &dir).unwrap();

        assert!(ok.success);
        assert!(!failed.success);
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let runner = SystemCommandRunner;
        let result = runner.run(
            "mcpm-definitely-not-a-real-program",
            &[],
            &std::env::temp_dir(),
        );
        assert!(result.is_err());
    }
}
