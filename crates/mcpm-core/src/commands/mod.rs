//! High-level commands for the CLI and TUI frontends.
//!
//! `install` and `update` prepare a [`ProvisioningSession`] for a frontend to
//! drive; `add`, `remove` and `list` run to completion directly.
//!
//! [`ProvisioningSession`]: crate::session::ProvisioningSession

pub mod add;
pub mod install;
pub mod list;
pub mod remove;
pub mod update;

pub use add::{AddCommand, AddOptions};
pub use install::InstallCommand;
pub use list::{InstalledServer, ListCommand};
pub use remove::{RemoveCommand, RemoveOptions};
pub use update::UpdateCommand;

use crate::client::TargetHost;

/// Hosts chosen by `--claude` / `--gemini`; neither flag means every host.
pub fn hosts_from_flags(claude: bool, gemini: bool) -> Vec<TargetHost> {
    if !claude && !gemini {
        return TargetHost::ALL.to_vec();
    }
    let mut hosts = Vec::new();
    if claude {
        hosts.push(TargetHost::ClaudeCode);
    }
    if gemini {
        hosts.push(TargetHost::GeminiCli);
    }
    hosts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_selects_every_host() {
        assert_eq!(hosts_from_flags(false, false), TargetHost::ALL.to_vec());
        assert_eq!(hosts_from_flags(false, true), vec![TargetHost::GeminiCli]);
        assert_eq!(hosts_from_flags(true, true), TargetHost::ALL.to_vec());
    }
}
