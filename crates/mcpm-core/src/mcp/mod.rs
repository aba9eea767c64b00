//! Host-agnostic MCP server definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::build::{LaunchSpec, server_identity};

/// How a host reaches the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum McpTransport {
    Stdio { command: String, args: Vec<String> },
    Http { url: String },
    Sse { url: String },
}

impl McpTransport {
    pub fn kind(&self) -> TransportKind {
        match self {
            McpTransport::Stdio { .. } => TransportKind::Stdio,
            McpTransport::Http { .. } => TransportKind::Http,
            McpTransport::Sse { .. } => TransportKind::Sse,
        }
    }
}

/// Transport tag without payload, as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Stdio,
    Http,
    Sse,
}

impl TransportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransportKind::Stdio => "stdio",
            TransportKind::Http => "http",
            TransportKind::Sse => "sse",
        }
    }

    /// `http(s)://` targets default to HTTP, everything else to stdio.
    pub fn detect(command_or_url: &str) -> Self {
        if command_or_url.starts_with("http://") || command_or_url.starts_with("https://") {
            TransportKind::Http
        } else {
            TransportKind::Stdio
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stdio" => Ok(TransportKind::Stdio),
            "http" => Ok(TransportKind::Http),
            "sse" => Ok(TransportKind::Sse),
            other => Err(format!(
                "unknown transport '{other}' (expected stdio, http or sse)"
            )),
        }
    }
}

/// A server as handed to each host adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDefinition {
    pub name: String,
    pub transport: McpTransport,
    /// Sorted so every host sees the same order.
    pub env: BTreeMap<String, String>,
}

impl ServerDefinition {
    pub fn stdio(name: impl Into<String>, command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            transport: McpTransport::Stdio {
                command: command.into(),
                args,
            },
            env: BTreeMap::new(),
        }
    }

    /// Build a definition from user input; `command_or_url` is a URL for the
    /// network transports and `args` are ignored there.
    pub fn from_parts(
        name: impl Into<String>,
        kind: TransportKind,
        command_or_url: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        let target = command_or_url.into();
        let transport = match kind {
            TransportKind::Stdio => McpTransport::Stdio {
                command: target,
                args,
            },
            TransportKind::Http => McpTransport::Http { url: target },
            TransportKind::Sse => McpTransport::Sse { url: target },
        };
        Self {
            name: name.into(),
            transport,
            env: BTreeMap::new(),
        }
    }

    /// Stdio definition named by [`server_identity`].
    pub fn from_launch_spec(spec: &LaunchSpec, env: BTreeMap<String, String>) -> Self {
        Self {
            name: server_identity(spec),
            transport: McpTransport::Stdio {
                command: spec.command().to_string(),
                args: spec.args().to_vec(),
            },
            env,
        }
    }

    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }
}

/// Parse `KEY=VALUE` pairs; the value may itself contain `=`.
pub fn parse_env_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("invalid environment variable '{raw}' (expected KEY=VALUE)")),
    }
}
