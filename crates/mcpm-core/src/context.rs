//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::build::BuildDetector;
use crate::client::ClientContext;
use crate::config::{McpmSettings, SettingsStore};
use crate::deploy::ConfigInjector;
use crate::git::GitFetcher;
use crate::session::SessionServices;
use crate::shell::{CommandRunner, LoginShellRunner, ShellRunner, SystemCommandRunner};

/// Unified application context.
///
/// Frontends (CLI/TUI) create this once and ask it for services. Settings are
/// loaded eagerly so every service sees the same layered configuration.
#[derive(Debug, Clone)]
pub struct AppContext {
    home_dir: PathBuf,
    project_root: PathBuf,
    global_config_dir: PathBuf,
    settings: McpmSettings,
}

impl AppContext {
    /// Create a context from the current process environment.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        let project_root = std::env::current_dir()?;
        let global_config_dir = dirs::config_dir()
            .map(|p| p.join("mcpm"))
            .unwrap_or_else(|| home_dir.join(".config").join("mcpm"));
        Self::with_global_config_dir(home_dir, project_root, global_config_dir)
    }

    /// Create a context with explicit paths (tests, embedding).
    pub fn with_global_config_dir(
        home_dir: PathBuf,
        project_root: PathBuf,
        global_config_dir: PathBuf,
    ) -> anyhow::Result<Self> {
        let settings =
            SettingsStore::new(global_config_dir.clone(), project_root.clone()).load()?;
        Ok(Self {
            home_dir,
            project_root,
            global_config_dir,
            settings,
        })
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn global_config_dir(&self) -> &Path {
        &self.global_config_dir
    }

    pub fn settings(&self) -> &McpmSettings {
        &self.settings
    }

    /// Directory holding cloned server repositories.
    pub fn servers_dir(&self) -> PathBuf {
        self.project_root.join(".mcp").join("servers")
    }

    pub fn client_context(&self) -> ClientContext {
        ClientContext::new(self.home_dir.clone(), self.project_root.clone())
    }

    pub fn shell_runner(&self) -> Arc<dyn ShellRunner> {
        match self.settings.shell.as_deref() {
            Some(shell) => Arc::new(LoginShellRunner::with_shell(shell)),
            None => Arc::new(LoginShellRunner::detect()),
        }
    }

    pub fn command_runner(&self) -> Arc<dyn CommandRunner> {
        Arc::new(SystemCommandRunner)
    }

    pub fn build_detector(&self) -> BuildDetector {
        BuildDetector::with_default_strategies(self.shell_runner())
    }

    pub fn git_fetcher(&self) -> GitFetcher {
        GitFetcher::new(self.servers_dir(), self.command_runner())
    }

    pub fn injector(&self) -> ConfigInjector {
        ConfigInjector::with_default_hosts(
            self.client_context(),
            self.command_runner(),
            self.settings.claude_program(),
        )
    }

    /// Everything a provisioning session needs to perform its effects.
    pub fn session_services(&self) -> SessionServices {
        SessionServices::new(
            Arc::new(self.git_fetcher()),
            self.build_detector(),
            self.injector(),
        )
    }
}
