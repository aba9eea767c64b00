//! mcpm settings and host settings-document handling.
//!
//! Two unrelated kinds of file live here:
//! - `mcpm.toml` settings, layered global → project (read-only input)
//! - host JSON settings documents edited by the file-merge host
//!   ([`managed_json`])

pub mod managed_json;

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::client::TargetHost;

pub use managed_json::ConfigError;

/// File name of the project-level settings layer.
pub const PROJECT_SETTINGS_FILE: &str = "mcpm.toml";

/// File name of the global settings layer inside the config directory.
pub const GLOBAL_SETTINGS_FILE: &str = "config.toml";

const DEFAULT_CLAUDE_PROGRAM: &str = "claude";

/// Settings recognised in `config.toml` / `mcpm.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct McpmSettings {
    /// Shell used for build steps (`zsh`, `bash`, `sh`, or a path).
    #[serde(default)]
    pub shell: Option<String>,

    /// Hosts preselected in the target picker.
    #[serde(default)]
    pub targets: Option<Vec<TargetHost>>,

    /// Program invoked for Claude Code registration.
    #[serde(default)]
    pub claude_command: Option<String>,
}

impl McpmSettings {
    /// Overlay `other` on top of `self`; set fields win.
    pub fn merge(&mut self, other: McpmSettings) {
        if other.shell.is_some() {
            self.shell = other.shell;
        }
        if other.targets.is_some() {
            self.targets = other.targets;
        }
        if other.claude_command.is_some() {
            self.claude_command = other.claude_command;
        }
    }

    pub fn claude_program(&self) -> String {
        self.claude_command
            .clone()
            .unwrap_or_else(|| DEFAULT_CLAUDE_PROGRAM.to_string())
    }

    /// Hosts preselected when the operator reaches target selection.
    pub fn default_targets(&self) -> Vec<TargetHost> {
        match &self.targets {
            Some(targets) => targets.clone(),
            None => TargetHost::ALL.to_vec(),
        }
    }
}

/// Loads the layered settings for one project.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    global_dir: PathBuf,
    project_root: PathBuf,
}

impl SettingsStore {
    pub fn new(global_dir: PathBuf, project_root: PathBuf) -> Self {
        Self {
            global_dir,
            project_root,
        }
    }

    pub fn global_path(&self) -> PathBuf {
        self.global_dir.join(GLOBAL_SETTINGS_FILE)
    }

    pub fn project_path(&self) -> PathBuf {
        self.project_root.join(PROJECT_SETTINGS_FILE)
    }

    pub fn load(&self) -> anyhow::Result<McpmSettings> {
        let mut settings = load_layer(&self.global_path())?;
        settings.merge(load_layer(&self.project_path())?);
        Ok(settings)
    }
}

fn load_layer(path: &Path) -> anyhow::Result<McpmSettings> {
    if !path.exists() {
        return Ok(McpmSettings::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    parse_settings_str(&content)
        .with_context(|| format!("Failed to parse settings file: {}", path.display()))
}

/// Parse settings from TOML text.
pub fn parse_settings_str(content: &str) -> anyhow::Result<McpmSettings> {
    let settings: McpmSettings = toml::from_str(content)?;
    if let Some(shell) = &settings.shell
        && shell.trim().is_empty()
    {
        anyhow::bail!("'shell' must not be empty");
    }
    Ok(settings)
}
