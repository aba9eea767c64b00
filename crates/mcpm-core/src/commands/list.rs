use std::path::PathBuf;

use anyhow::Context;

use crate::context::AppContext;
use crate::git::GitFetcher;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledServer {
    pub name: String,
    pub path: PathBuf,
}

/// Lists checkouts under `.mcp/servers`.
#[derive(Debug, Clone)]
pub struct ListCommand {
    fetcher: GitFetcher,
}

impl ListCommand {
    pub fn new(fetcher: GitFetcher) -> Self {
        Self { fetcher }
    }

    pub fn from_context(ctx: &AppContext) -> Self {
        Self::new(ctx.git_fetcher())
    }

    pub fn execute(&self) -> anyhow::Result<Vec<InstalledServer>> {
        let names = self.fetcher.list_servers().with_context(|| {
            format!(
                "Failed to list servers in {}",
                self.fetcher.servers_dir().display()
            )
        })?;
        Ok(names
            .into_iter()
            .map(|name| InstalledServer {
                path: self.fetcher.servers_dir().join(&name),
                name,
            })
            .collect())
    }
}
