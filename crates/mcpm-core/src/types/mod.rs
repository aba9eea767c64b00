//! Shared core types used across the build, session and deploy layers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a registration lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigScope {
    /// Current project only.
    #[default]
    ProjectLocal,
    /// The operator's global configuration.
    Global,
}

impl ConfigScope {
    pub fn from_global_flag(global: bool) -> Self {
        if global {
            ConfigScope::Global
        } else {
            ConfigScope::ProjectLocal
        }
    }

    pub fn is_global(self) -> bool {
        matches!(self, ConfigScope::Global)
    }

    /// Human label used in target pickers and command output.
    pub fn label(self) -> &'static str {
        match self {
            ConfigScope::ProjectLocal => "Current Dir",
            ConfigScope::Global => "Global",
        }
    }
}

impl fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flag_maps_to_scope() {
        assert_eq!(ConfigScope::from_global_flag(true), ConfigScope::Global);
        assert_eq!(
            ConfigScope::from_global_flag(false),
            ConfigScope::ProjectLocal
        );
    }

    #[test]
    fn scope_serializes_as_kebab_case() {
        let json = serde_json::to_string(&ConfigScope::ProjectLocal).unwrap();
        assert_eq!(json, "\"project-local\"");
    }
}
