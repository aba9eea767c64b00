//! Direct registration of an existing server, without cloning or building.

use std::collections::BTreeMap;

use crate::client::TargetHost;
use crate::context::AppContext;
use crate::deploy::{ConfigInjector, RegistrationReport};
use crate::mcp::{ServerDefinition, TransportKind, parse_env_pair};
use crate::types::ConfigScope;

#[derive(Debug, Clone)]
pub struct AddOptions {
    pub name: String,
    /// Executable for stdio, URL for http/sse.
    pub command_or_url: String,
    pub args: Vec<String>,
    /// Detected from `command_or_url` when unset.
    pub transport: Option<TransportKind>,
    /// Raw `KEY=VALUE` pairs.
    pub env: Vec<String>,
    pub hosts: Vec<TargetHost>,
    pub scope: ConfigScope,
}

impl AddOptions {
    pub fn new(name: impl Into<String>, command_or_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command_or_url: command_or_url.into(),
            args: Vec::new(),
            transport: None,
            env: Vec::new(),
            hosts: TargetHost::ALL.to_vec(),
            scope: ConfigScope::ProjectLocal,
        }
    }

    pub fn transport(&self) -> TransportKind {
        self.transport
            .unwrap_or_else(|| TransportKind::detect(&self.command_or_url))
    }

    pub fn definition(&self) -> anyhow::Result<ServerDefinition> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Server name must not be empty");
        }
        let env = self
            .env
            .iter()
            .map(|raw| parse_env_pair(raw).map_err(anyhow::Error::msg))
            .collect::<anyhow::Result<BTreeMap<_, _>>>()?;
        Ok(ServerDefinition::from_parts(
            self.name.clone(),
            self.transport(),
            self.command_or_url.clone(),
            self.args.clone(),
        )
        .with_env(env))
    }
}

#[derive(Debug, Clone)]
pub struct AddCommand {
    injector: ConfigInjector,
}

impl AddCommand {
    pub fn new(injector: ConfigInjector) -> Self {
        Self { injector }
    }

    pub fn from_context(ctx: &AppContext) -> Self {
        Self::new(ctx.injector())
    }

    /// Per-host outcomes; invalid options fail before any host is touched.
    pub fn execute(&self, options: &AddOptions) -> anyhow::Result<RegistrationReport> {
        let definition = options.definition()?;
        tracing::info!(
            server = %definition.name,
            transport = %options.transport(),
            "adding server"
        );
        Ok(self
            .injector
            .register_definition(&definition, &options.hosts, options.scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::McpTransport;

    #[test]
    fn url_targets_default_to_http() {
        let options = AddOptions::new("sentry", "https://mcp.sentry.dev/mcp");
        let def = options.definition().unwrap();
        assert_eq!(
            def.transport,
            McpTransport::Http {
                url: "https://mcp.sentry.dev/mcp".to_string()
            }
        );
    }

    #[test]
    fn explicit_transport_wins() {
        let mut options = AddOptions::new("slack", "https://mcp.slack.com/sse");
        options.transport = Some(TransportKind::Sse);
        assert_eq!(options.transport(), TransportKind::Sse);
    }

    #[test]
    fn malformed_env_is_rejected() {
        let mut options = AddOptions::new("local", "/usr/local/bin/server");
        options.env = vec!["API_KEY".to_string()];
        assert!(options.definition().is_err());
    }
}
