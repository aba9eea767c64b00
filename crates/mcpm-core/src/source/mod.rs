//! Repository references as typed on the command line.

use std::fmt;

const GITHUB_BASE: &str = "https://github.com/";
const GITLAB_BASE: &str = "https://gitlab.com/";
const REDHAT_GITLAB_BASE: &str = "https://gitlab.cee.redhat.com/";

/// Where a reference points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    GitHub,
    GitLab,
    RedHatGitLab,
    /// `http(s)://` URL, used verbatim.
    Url,
    /// Anything else; handed to git unchanged.
    Other,
}

impl Provider {
    pub fn label(self) -> &'static str {
        match self {
            Provider::GitHub => "GitHub",
            Provider::GitLab => "GitLab",
            Provider::RedHatGitLab => "GitLab Red Hat",
            Provider::Url => "Custom URL",
            Provider::Other => "Unknown",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A parsed repository reference.
///
/// Supported forms:
/// - `@org/repo` (GitHub)
/// - `gl:@org/repo` (GitLab.com)
/// - `gl:rh:@group/sub/repo` (gitlab.cee.redhat.com)
/// - `https://host/path/repo.git`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoReference {
    raw: String,
    url: String,
    provider: Provider,
}

impl RepoReference {
    pub fn parse(input: &str) -> Self {
        let raw = input.trim();
        let (url, provider) = if let Some(path) = raw.strip_prefix("gl:rh:@") {
            (hosted_url(REDHAT_GITLAB_BASE, path), Provider::RedHatGitLab)
        } else if let Some(path) = raw.strip_prefix("gl:@") {
            (hosted_url(GITLAB_BASE, path), Provider::GitLab)
        } else if let Some(path) = raw.strip_prefix('@') {
            (hosted_url(GITHUB_BASE, path), Provider::GitHub)
        } else if raw.starts_with("http://") || raw.starts_with("https://") {
            (raw.to_string(), Provider::Url)
        } else {
            (raw.to_string(), Provider::Other)
        };
        Self {
            raw: raw.to_string(),
            url,
            provider,
        }
    }

    /// The reference as the operator typed it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Clone URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Directory name under `.mcp/servers`: last URL segment minus `.git`.
    pub fn repo_name(&self) -> String {
        let trimmed = self.url.trim_end_matches('/');
        let last = trimmed.rsplit(['/', ':']).next().unwrap_or(trimmed);
        last.strip_suffix(".git").unwrap_or(last).to_string()
    }
}

impl fmt::Display for RepoReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn hosted_url(base: &str, path: &str) -> String {
    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    format!("{base}{path}.git")
}
