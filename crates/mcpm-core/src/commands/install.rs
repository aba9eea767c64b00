use crate::client::TargetHost;
use crate::context::AppContext;
use crate::session::ProvisioningSession;
use crate::source::RepoReference;
use crate::types::ConfigScope;

/// Prepares install sessions with the configured default targets.
#[derive(Debug, Clone)]
pub struct InstallCommand {
    default_targets: Vec<TargetHost>,
}

impl InstallCommand {
    pub fn new(default_targets: Vec<TargetHost>) -> Self {
        Self { default_targets }
    }

    pub fn from_context(ctx: &AppContext) -> Self {
        Self::new(ctx.settings().default_targets())
    }

    pub fn session(&self, reference: &str, scope: ConfigScope) -> anyhow::Result<ProvisioningSession> {
        let reference = RepoReference::parse(reference);
        if reference.repo_name().is_empty() {
            anyhow::bail!("Invalid repository reference: '{}'", reference.raw());
        }
        tracing::info!(
            url = reference.url(),
            provider = %reference.provider(),
            "installing {}",
            reference.repo_name()
        );
        Ok(ProvisioningSession::install(reference, scope)
            .with_default_targets(self.default_targets.clone()))
    }
}
