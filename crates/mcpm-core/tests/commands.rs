mod support;

use std::sync::Arc;

use mcpm_core::client::{HostError, TargetHost};
use mcpm_core::commands::{AddCommand, AddOptions, ListCommand, RemoveCommand, RemoveOptions};
use mcpm_core::config::ConfigError;
use mcpm_core::git::GitFetcher;
use mcpm_core::mcp::TransportKind;
use mcpm_core::types::ConfigScope;
use serde_json::json;
use support::{FakeCommandRunner, Workspace, read_json, write};

#[test]
fn add_http_server_writes_url_record() {
    let ws = Workspace::new();
    let runner = Arc::new(FakeCommandRunner::new());
    let command = AddCommand::new(ws.injector(runner.clone()));
    let mut options = AddOptions::new("sentry", "https://mcp.sentry.dev/mcp");
    options.env = vec!["ORG=acme".to_string()];

    let report = command.execute(&options).unwrap();

    assert!(report.is_success());
    assert_eq!(
        read_json(&ws.gemini_settings())["mcpServers"]["sentry"],
        json!({"type": "http", "url": "https://mcp.sentry.dev/mcp", "env": {"ORG": "acme"}})
    );
    let (_, args, _) = &runner.calls()[0];
    assert_eq!(
        args,
        &vec![
            "mcp", "add", "--scope", "local", "--transport", "http", "--env", "ORG=acme",
            "sentry", "https://mcp.sentry.dev/mcp",
        ]
    );
}

#[test]
fn add_stdio_server_to_gemini_only() {
    let ws = Workspace::new();
    let runner = Arc::new(FakeCommandRunner::new());
    let command = AddCommand::new(ws.injector(runner.clone()));
    let mut options = AddOptions::new("local", "node");
    options.args = vec!["/opt/server.js".to_string()];
    options.transport = Some(TransportKind::Stdio);
    options.hosts = vec![TargetHost::GeminiCli];

    command.execute(&options).unwrap();

    assert!(runner.calls().is_empty());
    assert_eq!(
        read_json(&ws.gemini_settings())["mcpServers"]["local"],
        json!({"type": "stdio", "command": "node", "args": ["/opt/server.js"]})
    );
}

#[test]
fn remove_deletes_only_the_named_server() {
    let ws = Workspace::new();
    write(
        &ws.gemini_settings(),
        r#"{"theme": "dark", "mcpServers": {"a": {"type": "stdio", "command": "x", "args": []}, "b": {"type": "sse", "url": "https://b"}}}"#,
    );
    let runner = Arc::new(FakeCommandRunner::new());
    let command = RemoveCommand::new(ws.injector(runner.clone()));

    let report = command.execute(&RemoveOptions::new("a")).unwrap();

    assert!(report.is_success());
    let settings = read_json(&ws.gemini_settings());
    assert_eq!(settings["theme"], "dark");
    assert!(settings["mcpServers"].get("a").is_none());
    assert_eq!(settings["mcpServers"]["b"]["url"], "https://b");

    let (_, args, _) = &runner.calls()[0];
    assert_eq!(args, &vec!["mcp", "remove", "--scope", "local", "a"]);
}

#[test]
fn remove_reports_missing_settings_and_missing_server() {
    let ws = Workspace::new();
    let command = RemoveCommand::new(ws.injector(Arc::new(FakeCommandRunner::new())));
    let mut options = RemoveOptions::new("ghost");
    options.hosts = vec![TargetHost::GeminiCli];

    let report = command.execute(&options).unwrap();
    let failure = report.failures().next().unwrap();
    assert!(matches!(
        failure.cause,
        HostError::Config(ConfigError::NotFound { .. })
    ));

    write(&ws.gemini_settings(), r#"{"mcpServers": {}}"#);
    let report = command.execute(&options).unwrap();
    let failure = report.failures().next().unwrap();
    assert!(matches!(failure.cause, HostError::NotFound { .. }));
    assert_eq!(failure.cause.to_string(), "server ghost not found");
}

#[test]
fn remove_global_uses_home_settings() {
    let ws = Workspace::new();
    let home_settings = ws.home.join(".gemini").join("settings.json");
    write(&home_settings, r#"{"mcpServers": {"weather": {"type": "stdio"}}}"#);
    let command = RemoveCommand::new(ws.injector(Arc::new(FakeCommandRunner::new())));
    let mut options = RemoveOptions::new("weather");
    options.hosts = vec![TargetHost::GeminiCli];
    options.scope = ConfigScope::Global;

    let report = command.execute(&options).unwrap();

    assert!(report.is_success());
    assert_eq!(read_json(&home_settings)["mcpServers"], json!({}));
}

#[test]
fn list_reports_installed_checkouts() {
    let ws = Workspace::new();
    ws.server_dir("weather");
    ws.server_dir("filesystem");
    let fetcher = GitFetcher::new(
        ws.project.join(".mcp").join("servers"),
        Arc::new(FakeCommandRunner::new()),
    );

    let servers = ListCommand::new(fetcher).execute().unwrap();

    let names: Vec<_> = servers.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["filesystem", "weather"]);
    assert!(servers[1].path.ends_with(".mcp/servers/weather"));
}
