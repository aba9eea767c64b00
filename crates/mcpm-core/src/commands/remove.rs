use crate::client::TargetHost;
use crate::context::AppContext;
use crate::deploy::{ConfigInjector, RegistrationReport};
use crate::types::ConfigScope;

#[derive(Debug, Clone)]
pub struct RemoveOptions {
    pub name: String,
    pub hosts: Vec<TargetHost>,
    pub scope: ConfigScope,
}

impl RemoveOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hosts: TargetHost::ALL.to_vec(),
            scope: ConfigScope::ProjectLocal,
        }
    }
}

/// Removes a server definition from host configuration. The checkout under
/// `.mcp/servers` is left alone.
#[derive(Debug, Clone)]
pub struct RemoveCommand {
    injector: ConfigInjector,
}

impl RemoveCommand {
    pub fn new(injector: ConfigInjector) -> Self {
        Self { injector }
    }

    pub fn from_context(ctx: &AppContext) -> Self {
        Self::new(ctx.injector())
    }

    pub fn execute(&self, options: &RemoveOptions) -> anyhow::Result<RegistrationReport> {
        if options.name.trim().is_empty() {
            anyhow::bail!("Server name must not be empty");
        }
        Ok(self
            .injector
            .remove(&options.name, &options.hosts, options.scope))
    }
}
