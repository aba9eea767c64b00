//! Host adapters: the tools that consume MCP server definitions.
//!
//! Each adapter knows one way of persisting a [`ServerDefinition`]:
//! - Claude Code is driven through its own `mcp add` / `mcp remove` commands
//! - Gemini CLI is edited in place by merging into its `settings.json`

pub mod claude_code;
pub mod gemini_cli;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::mcp::ServerDefinition;
use crate::types::ConfigScope;

pub use claude_code::ClaudeCodeHost;
pub use gemini_cli::GeminiCliHost;

/// Hosts mcpm can register servers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetHost {
    ClaudeCode,
    GeminiCli,
}

impl TargetHost {
    /// Every host, in registration order.
    pub const ALL: [TargetHost; 2] = [TargetHost::ClaudeCode, TargetHost::GeminiCli];

    pub fn id(self) -> &'static str {
        match self {
            TargetHost::ClaudeCode => "claude-code",
            TargetHost::GeminiCli => "gemini-cli",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TargetHost::ClaudeCode => "Claude Code",
            TargetHost::GeminiCli => "Gemini CLI",
        }
    }
}

impl fmt::Display for TargetHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TargetHost {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetHost::ALL
            .into_iter()
            .find(|host| host.id() == s)
            .ok_or_else(|| format!("unknown host '{s}'"))
    }
}

/// Paths an adapter resolves its configuration against.
#[derive(Debug, Clone)]
pub struct ClientContext {
    pub home_dir: PathBuf,
    pub project_root: PathBuf,
}

impl ClientContext {
    pub fn new(home_dir: PathBuf, project_root: PathBuf) -> Self {
        Self {
            home_dir,
            project_root,
        }
    }
}

/// Why a single host rejected a registration or removal.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("`{program}` failed:\n{output}")]
    Command { program: String, output: String },
    #[error("Failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("server {name} not found")]
    NotFound { name: String },
}

impl HostError {
    /// Captured output for failed host commands.
    pub fn output(&self) -> Option<&str> {
        match self {
            HostError::Command { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// One host's way of persisting server definitions.
pub trait HostAdapter: Send + Sync + fmt::Debug {
    fn host(&self) -> TargetHost;

    /// Create or wholesale replace the entry named `definition.name`.
    fn register(
        &self,
        ctx: &ClientContext,
        definition: &ServerDefinition,
        scope: ConfigScope,
    ) -> Result<(), HostError>;

    fn remove(&self, ctx: &ClientContext, name: &str, scope: ConfigScope)
    -> Result<(), HostError>;
}
