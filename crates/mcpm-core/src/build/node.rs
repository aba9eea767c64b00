//! Node.js / TypeScript strategy.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use super::{BuildError, BuildStrategy, LaunchSpec, display_path};
use crate::shell::ShellRunner;

const PACKAGE_JSON: &str = "package.json";
const PACKAGES_DIR: &str = "packages";
const NODE_COMMAND: &str = "node";

/// Sub-package directories tried first in a monorepo, in order.
const KNOWN_SERVER_PACKAGES: [&str; 3] = ["mcp", "server", "mcp-server"];

/// Package names containing this look like the server package.
const SERVER_NAME_MARKER: &str = "mcp";

#[derive(Debug, Clone, Default, Deserialize)]
struct PackageJson {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    main: Option<String>,
    #[serde(default)]
    bin: Option<Value>,
    #[serde(default)]
    scripts: HashMap<String, String>,
}

impl PackageJson {
    /// Missing or malformed manifests read as empty; npm itself reports the
    /// real problem during install.
    fn read(path: &Path) -> Self {
        let Ok(bytes) = std::fs::read(path) else {
            return Self::default();
        };
        serde_json::from_slice(&bytes).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), "ignoring unparsable package.json: {}", err);
            Self::default()
        })
    }

    fn declares_bin(&self) -> bool {
        self.bin.as_ref().is_some_and(|bin| !bin.is_null())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    pub fn program(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }

    /// Most specific lock file whose manager is installed; npm otherwise.
    pub fn select(repo: &Path, shell: &dyn ShellRunner) -> Self {
        let candidates = [
            (PackageManager::Pnpm, "pnpm-lock.yaml"),
            (PackageManager::Yarn, "yarn.lock"),
        ];
        candidates
            .into_iter()
            .find(|(manager, lock)| repo.join(lock).exists() && shell.has_program(manager.program()))
            .map(|(manager, _)| manager)
            .unwrap_or(PackageManager::Npm)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NodeStrategy;

impl BuildStrategy for NodeStrategy {
    fn name(&self) -> &'static str {
        "node"
    }

    fn detect(&self, repo: &Path) -> bool {
        repo.join(PACKAGE_JSON).is_file()
    }

    fn build(&self, repo: &Path, shell: &dyn ShellRunner) -> Result<LaunchSpec, BuildError> {
        let manager = PackageManager::select(repo, shell);
        tracing::debug!(manager = manager.program(), "selected package manager");

        shell.run(repo, &format!("{} install", manager.program()))?;

        let package = PackageJson::read(&repo.join(PACKAGE_JSON));
        if package.scripts.contains_key("build") {
            shell.run(repo, &format!("{} run build", manager.program()))?;
        }

        let entry = find_monorepo_entry(repo).unwrap_or_else(|| single_package_entry(repo, &package));

        // Environment discovery is manifest-only; Node servers declare none.
        Ok(LaunchSpec::without_env(
            NODE_COMMAND,
            vec![display_path(&entry)],
        ))
    }
}

/// Entry point of a `packages/*` monorepo, if one can be identified.
fn find_monorepo_entry(repo: &Path) -> Option<PathBuf> {
    let packages_dir = repo.join(PACKAGES_DIR);
    if !packages_dir.is_dir() {
        return None;
    }

    for name in KNOWN_SERVER_PACKAGES {
        let package_dir = packages_dir.join(name);
        if !package_dir.exists() {
            continue;
        }

        let dist_entry = package_dir.join("dist").join("index.js");
        if dist_entry.exists() {
            return Some(dist_entry);
        }

        let package = PackageJson::read(&package_dir.join(PACKAGE_JSON));
        if let Some(main) = package.main.as_deref().filter(|m| !m.is_empty()) {
            let main_entry = package_dir.join(main);
            if main_entry.exists() {
                return Some(main_entry);
            }
        }

        let src_entry = package_dir.join("src").join("index.js");
        if src_entry.exists() {
            return Some(src_entry);
        }
    }

    scan_server_packages(&packages_dir)
}

fn scan_server_packages(packages_dir: &Path) -> Option<PathBuf> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(packages_dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    dirs.into_iter().find_map(|package_dir| {
        let manifest = package_dir.join(PACKAGE_JSON);
        if !manifest.exists() {
            return None;
        }
        let package = PackageJson::read(&manifest);
        let looks_like_server = package
            .name
            .as_deref()
            .is_some_and(|name| name.contains(SERVER_NAME_MARKER))
            || package.declares_bin();
        let dist_entry = package_dir.join("dist").join("index.js");
        (looks_like_server && dist_entry.exists()).then_some(dist_entry)
    })
}

fn single_package_entry(repo: &Path, package: &PackageJson) -> PathBuf {
    let compiled = [
        Path::new("dist").join("index.js"),
        Path::new("build").join("index.js"),
    ];
    if let Some(entry) = compiled.iter().find(|entry| repo.join(entry).exists()) {
        return repo.join(entry);
    }

    let main = package
        .main
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or("index.js");
    repo.join(main)
}
