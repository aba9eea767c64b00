#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use mcpm_core::client::ClientContext;
use mcpm_core::deploy::ConfigInjector;
use mcpm_core::git::{FetchError, RepoFetcher};
use mcpm_core::shell::{CommandOutput, CommandRunner, ShellError, ShellRunner};
use mcpm_core::source::RepoReference;
use tempfile::TempDir;

/// Shell that records command lines instead of running them.
#[derive(Debug, Default)]
pub struct FakeShell {
    commands: Mutex<Vec<(PathBuf, String)>>,
    programs: HashSet<String>,
    failing: Vec<(String, String)>,
}

impl FakeShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `program` as present on PATH.
    pub fn with_program(mut self, program: &str) -> Self {
        self.programs.insert(program.to_string());
        self
    }

    /// Fail every command line starting with `prefix`, printing `output`.
    pub fn failing(mut self, prefix: &str, output: &str) -> Self {
        self.failing.push((prefix.to_string(), output.to_string()));
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .map(|(_, command)| command.clone())
            .collect()
    }

    pub fn dirs(&self) -> Vec<PathBuf> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .map(|(dir, _)| dir.clone())
            .collect()
    }
}

impl ShellRunner for FakeShell {
    fn run(&self, dir: &Path, command_line: &str) -> Result<String, ShellError> {
        self.commands
            .lock()
            .unwrap()
            .push((dir.to_path_buf(), command_line.to_string()));
        if let Some((_, output)) = self
            .failing
            .iter()
            .find(|(prefix, _)| command_line.starts_with(prefix.as_str()))
        {
            return Err(ShellError::Failed {
                command: command_line.to_string(),
                status: "exit status: 1".to_string(),
                output: output.clone(),
            });
        }
        Ok(String::new())
    }

    fn has_program(&self, program: &str) -> bool {
        self.programs.contains(program)
    }
}

/// Command runner that records invocations and answers with canned output.
#[derive(Debug, Default)]
pub struct FakeCommandRunner {
    calls: Mutex<Vec<(String, Vec<String>, PathBuf)>>,
    fail_with: Option<String>,
}

impl FakeCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every invocation exits 1 with `output`.
    pub fn failing(output: &str) -> Self {
        Self {
            fail_with: Some(output.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeCommandRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> std::io::Result<CommandOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec(), cwd.to_path_buf()));
        Ok(match &self.fail_with {
            Some(output) => CommandOutput::failed(1, output.clone()),
            None => CommandOutput::ok(""),
        })
    }
}

/// Fetcher that hands out a pre-made checkout.
#[derive(Debug)]
pub struct FakeFetcher {
    pub path: PathBuf,
    pub pulled: Mutex<Vec<PathBuf>>,
}

impl FakeFetcher {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            pulled: Mutex::new(Vec::new()),
        }
    }
}

impl RepoFetcher for FakeFetcher {
    fn fetch(&self, _reference: &RepoReference) -> Result<PathBuf, FetchError> {
        Ok(self.path.clone())
    }

    fn pull(&self, repo: &Path) -> Result<(), FetchError> {
        self.pulled.lock().unwrap().push(repo.to_path_buf());
        Ok(())
    }
}

/// Temporary home + project pair.
pub struct Workspace {
    pub temp: TempDir,
    pub home: PathBuf,
    pub project: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        let project = temp.path().join("project");
        std::fs::create_dir_all(&home).unwrap();
        std::fs::create_dir_all(&project).unwrap();
        Self {
            temp,
            home,
            project,
        }
    }

    pub fn client_context(&self) -> ClientContext {
        ClientContext::new(self.home.clone(), self.project.clone())
    }

    /// Create `.mcp/servers/<name>` and return it.
    pub fn server_dir(&self, name: &str) -> PathBuf {
        let dir = self.project.join(".mcp").join("servers").join(name);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub fn gemini_settings(&self) -> PathBuf {
        self.project.join(".gemini").join("settings.json")
    }

    pub fn injector(&self, runner: Arc<dyn CommandRunner>) -> ConfigInjector {
        ConfigInjector::with_default_hosts(self.client_context(), runner, "claude")
    }
}

pub fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

pub fn read_json(path: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}
