use serde::{Deserialize, Serialize};

/// Resolved executable, arguments and required secret names for one server.
///
/// Built once per build attempt and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchSpec {
    command: String,
    args: Vec<String>,
    required_env: Vec<String>,
}

impl LaunchSpec {
    pub fn new(command: impl Into<String>, args: Vec<String>, required_env: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            required_env,
        }
    }

    /// Spec for heuristic strategies, which never declare environment.
    pub fn without_env(command: impl Into<String>, args: Vec<String>) -> Self {
        Self::new(command, args, Vec::new())
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Names in declaration order, which is also prompt order.
    pub fn required_env(&self) -> &[String] {
        &self.required_env
    }
}
