//! Config injection: apply or remove a server definition across hosts.
//!
//! Hosts are visited sequentially in a fixed order. Each host is isolated:
//! its failure is recorded in the [`RegistrationReport`] and the next host is
//! still tried.

mod report;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::build::LaunchSpec;
use crate::client::{ClaudeCodeHost, ClientContext, GeminiCliHost, HostAdapter, TargetHost};
use crate::mcp::ServerDefinition;
use crate::shell::CommandRunner;
use crate::types::ConfigScope;

pub use report::{HostOutcome, PartialFailureError, RegistrationError, RegistrationReport};

#[derive(Debug, Clone)]
pub struct ConfigInjector {
    ctx: ClientContext,
    hosts: Arc<Vec<Box<dyn HostAdapter>>>,
}

impl ConfigInjector {
    /// Claude Code first, then Gemini CLI.
    pub fn with_default_hosts(
        ctx: ClientContext,
        runner: Arc<dyn CommandRunner>,
        claude_program: impl Into<String>,
    ) -> Self {
        Self::with_hosts(
            ctx,
            vec![
                Box::new(ClaudeCodeHost::new(claude_program, runner)),
                Box::new(GeminiCliHost::new()),
            ],
        )
    }

    pub fn with_hosts(ctx: ClientContext, hosts: Vec<Box<dyn HostAdapter>>) -> Self {
        Self {
            ctx,
            hosts: Arc::new(hosts),
        }
    }

    pub fn context(&self) -> &ClientContext {
        &self.ctx
    }

    /// Register a built server; `secrets` become the definition's environment.
    pub fn register(
        &self,
        spec: &LaunchSpec,
        targets: &[TargetHost],
        secrets: &BTreeMap<String, String>,
        scope: ConfigScope,
    ) -> RegistrationReport {
        let definition = ServerDefinition::from_launch_spec(spec, secrets.clone());
        self.register_definition(&definition, targets, scope)
    }

    pub fn register_definition(
        &self,
        definition: &ServerDefinition,
        targets: &[TargetHost],
        scope: ConfigScope,
    ) -> RegistrationReport {
        let mut report = RegistrationReport::new(&definition.name);
        for host in self.selected(targets) {
            let result = host.register(&self.ctx, definition, scope);
            match &result {
                Ok(()) => tracing::info!(host = host.host().id(), server = %definition.name, scope = %scope, "registered server"),
                Err(err) => tracing::warn!(host = host.host().id(), server = %definition.name, "registration failed: {}", err),
            }
            report.push(host.host(), result);
        }
        report
    }

    pub fn remove(
        &self,
        name: &str,
        targets: &[TargetHost],
        scope: ConfigScope,
    ) -> RegistrationReport {
        let mut report = RegistrationReport::new(name);
        for host in self.selected(targets) {
            let result = host.remove(&self.ctx, name, scope);
            match &result {
                Ok(()) => tracing::info!(host = host.host().id(), server = name, "removed server"),
                Err(err) => tracing::warn!(host = host.host().id(), server = name, "removal failed: {}", err),
            }
            report.push(host.host(), result);
        }
        report
    }

    /// Adapters for `targets`, in registry order regardless of selection order.
    fn selected<'a>(
        &'a self,
        targets: &'a [TargetHost],
    ) -> impl Iterator<Item = &'a dyn HostAdapter> + 'a {
        self.hosts
            .iter()
            .map(|host| host.as_ref())
            .filter(move |host| targets.contains(&host.host()))
    }
}
