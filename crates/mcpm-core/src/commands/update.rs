use std::sync::Arc;

use anyhow::Context;

use crate::client::TargetHost;
use crate::context::AppContext;
use crate::git::{GitFetcher, RepoFetcher};
use crate::session::ProvisioningSession;
use crate::types::ConfigScope;

/// Pulls installed servers and prepares rebuild sessions.
#[derive(Debug, Clone)]
pub struct UpdateCommand {
    fetcher: GitFetcher,
    puller: Arc<dyn RepoFetcher>,
    default_targets: Vec<TargetHost>,
}

impl UpdateCommand {
    pub fn new(
        fetcher: GitFetcher,
        puller: Arc<dyn RepoFetcher>,
        default_targets: Vec<TargetHost>,
    ) -> Self {
        Self {
            fetcher,
            puller,
            default_targets,
        }
    }

    pub fn from_context(ctx: &AppContext) -> Self {
        let fetcher = ctx.git_fetcher();
        Self::new(
            fetcher.clone(),
            Arc::new(fetcher),
            ctx.settings().default_targets(),
        )
    }

    /// Names to update: every installed server with `all`, else `name`.
    pub fn targets(&self, name: Option<&str>, all: bool) -> anyhow::Result<Vec<String>> {
        if all {
            return Ok(self.fetcher.list_servers()?);
        }
        match name {
            Some(name) => Ok(vec![name.to_string()]),
            None => anyhow::bail!("Please specify a server name or use --all to update all servers"),
        }
    }

    /// Pull `name` and return a session that rebuilds it.
    pub fn prepare(&self, name: &str, scope: ConfigScope) -> anyhow::Result<ProvisioningSession> {
        let path = self.fetcher.server_path(name)?;
        self.puller
            .pull(&path)
            .with_context(|| format!("Failed to pull {name}"))?;
        Ok(ProvisioningSession::update(name, path, scope)
            .with_default_targets(self.default_targets.clone()))
    }
}
