//! Per-host registration outcomes.

use std::fmt;

use thiserror::Error;

use crate::client::{HostError, TargetHost};

/// A single host's failure, tagged with the host.
#[derive(Debug, Error)]
#[error("{host} configuration failed: {cause}")]
pub struct RegistrationError {
    pub host: TargetHost,
    #[source]
    pub cause: HostError,
}

#[derive(Debug)]
pub struct HostOutcome {
    pub host: TargetHost,
    pub result: Result<(), RegistrationError>,
}

impl HostOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes in the order hosts were tried.
#[derive(Debug)]
pub struct RegistrationReport {
    pub server: String,
    pub outcomes: Vec<HostOutcome>,
}

impl RegistrationReport {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, host: TargetHost, result: Result<(), HostError>) {
        let result = result.map_err(|cause| RegistrationError { host, cause });
        self.outcomes.push(HostOutcome { host, result });
    }

    /// True when every attempted host succeeded (vacuously for none).
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(HostOutcome::is_success)
    }

    pub fn succeeded(&self) -> impl Iterator<Item = TargetHost> + '_ {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_success())
            .map(|outcome| outcome.host)
    }

    pub fn failures(&self) -> impl Iterator<Item = &RegistrationError> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err())
    }

    pub fn into_result(self) -> Result<(), PartialFailureError> {
        if self.is_success() {
            return Ok(());
        }
        let failures = self
            .outcomes
            .into_iter()
            .filter_map(|outcome| outcome.result.err())
            .collect();
        Err(PartialFailureError {
            server: self.server,
            failures,
        })
    }
}

/// One or more hosts rejected the server.
#[derive(Debug)]
pub struct PartialFailureError {
    pub server: String,
    pub failures: Vec<RegistrationError>,
}

impl PartialFailureError {
    pub fn hosts(&self) -> Vec<TargetHost> {
        self.failures.iter().map(|failure| failure.host).collect()
    }
}

impl fmt::Display for PartialFailureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to configure {} for:", self.server)?;
        for failure in &self.failures {
            write!(f, "\n  {failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for PartialFailureError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_failure() -> HostError {
        HostError::Command {
            program: "claude".to_string(),
            output: "boom".to_string(),
        }
    }

    #[test]
    fn empty_report_is_success() {
        let report = RegistrationReport::new("weather");
        assert!(report.is_success());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn partial_failure_lists_failing_hosts() {
        let mut report = RegistrationReport::new("weather");
        report.push(TargetHost::ClaudeCode, Err(command_failure()));
        report.push(TargetHost::GeminiCli, Ok(()));

        assert!(!report.is_success());
        assert_eq!(report.succeeded().collect::<Vec<_>>(), vec![TargetHost::GeminiCli]);

        let err = report.into_result().unwrap_err();
        assert_eq!(err.hosts(), vec![TargetHost::ClaudeCode]);
        assert!(err.to_string().contains("Claude Code configuration failed"));
    }
}
