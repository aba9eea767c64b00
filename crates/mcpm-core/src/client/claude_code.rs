//! Claude Code host, driven through `claude mcp add` / `claude mcp remove`.

use std::sync::Arc;

use crate::client::{ClientContext, HostAdapter, HostError, TargetHost};
use crate::mcp::{McpTransport, ServerDefinition, TransportKind};
use crate::shell::CommandRunner;
use crate::types::ConfigScope;

#[derive(Debug, Clone)]
pub struct ClaudeCodeHost {
    program: String,
    runner: Arc<dyn CommandRunner>,
}

impl ClaudeCodeHost {
    pub fn new(program: impl Into<String>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn invoke(&self, ctx: &ClientContext, args: Vec<String>) -> Result<(), HostError> {
        tracing::debug!("{} {}", self.program, args.join(" "));
        let output = self
            .runner
            .run(&self.program, &args, &ctx.project_root)
            .map_err(|source| HostError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !output.success {
            return Err(HostError::Command {
                program: self.program.clone(),
                output: output.combined,
            });
        }
        Ok(())
    }
}

impl HostAdapter for ClaudeCodeHost {
    fn host(&self) -> TargetHost {
        TargetHost::ClaudeCode
    }

    fn register(
        &self,
        ctx: &ClientContext,
        definition: &ServerDefinition,
        scope: ConfigScope,
    ) -> Result<(), HostError> {
        self.invoke(ctx, add_args(definition, scope))
    }

    fn remove(
        &self,
        ctx: &ClientContext,
        name: &str,
        scope: ConfigScope,
    ) -> Result<(), HostError> {
        self.invoke(ctx, remove_args(name, scope))
    }
}

/// Claude Code calls project-private config "local" and global config "user".
pub fn scope_flag(scope: ConfigScope) -> &'static str {
    match scope {
        ConfigScope::ProjectLocal => "local",
        ConfigScope::Global => "user",
    }
}

/// Arguments for `claude mcp add`.
///
/// Stdio commands follow a `--` separator so server arguments that look like
/// flags are not parsed by `claude` itself.
pub fn add_args(definition: &ServerDefinition, scope: ConfigScope) -> Vec<String> {
    let mut args = vec![
        "mcp".to_string(),
        "add".to_string(),
        "--scope".to_string(),
        scope_flag(scope).to_string(),
    ];

    let kind = definition.transport.kind();
    if kind != TransportKind::Stdio {
        args.push("--transport".to_string());
        args.push(kind.as_str().to_string());
    }

    for (key, value) in &definition.env {
        args.push("--env".to_string());
        args.push(format!("{key}={value}"));
    }

    args.push(definition.name.clone());
    match &definition.transport {
        McpTransport::Stdio {
            command,
            args: server_args,
        } => {
            args.push("--".to_string());
            args.push(command.clone());
            args.extend(server_args.iter().cloned());
        }
        McpTransport::Http { url } | McpTransport::Sse { url } => args.push(url.clone()),
    }
    args
}

pub fn remove_args(name: &str, scope: ConfigScope) -> Vec<String> {
    vec![
        "mcp".to_string(),
        "remove".to_string(),
        "--scope".to_string(),
        scope_flag(scope).to_string(),
        name.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stdio_add_args_separate_server_command() {
        let mut def = ServerDefinition::stdio(
            "weather",
            "/srv/.venv/bin/python",
            vec!["/srv/main.py".to_string(), "--verbose".to_string()],
        );
        def.env.insert("API_KEY".to_string(), "k".to_string());

        let args = add_args(&def, ConfigScope::ProjectLocal);

        assert_eq!(
            args,
            vec![
                "mcp", "add", "--scope", "local", "--env", "API_KEY=k", "weather", "--",
                "/srv/.venv/bin/python", "/srv/main.py", "--verbose",
            ]
        );
    }

    #[test]
    fn http_add_args_carry_transport_and_url() {
        let def = ServerDefinition::from_parts(
            "sentry",
            TransportKind::Http,
            "https://mcp.sentry.dev/mcp",
            Vec::new(),
        );

        let args = add_args(&def, ConfigScope::Global);

        assert_eq!(
            args,
            vec![
                "mcp", "add", "--scope", "user", "--transport", "http", "sentry",
                "https://mcp.sentry.dev/mcp",
            ]
        );
    }

    #[test]
    fn remove_args_use_scope_flag() {
        assert_eq!(
            remove_args("weather", ConfigScope::Global),
            vec!["mcp", "remove", "--scope", "user", "weather"]
        );
    }
}
