//! Gemini CLI host, edited through its `settings.json`.

use std::path::PathBuf;

use serde_json::{Map, Value, json};

use crate::client::{ClientContext, HostAdapter, HostError, TargetHost};
use crate::config::managed_json::{RemoveOutcome, remove_entry_in_field, upsert_entry_in_field};
use crate::mcp::{McpTransport, ServerDefinition};
use crate::types::ConfigScope;

pub const SERVERS_FIELD: &str = "mcpServers";

#[derive(Debug, Default, Clone, Copy)]
pub struct GeminiCliHost;

impl GeminiCliHost {
    pub fn new() -> Self {
        Self
    }

    /// `<project>/.gemini/settings.json` or `<home>/.gemini/settings.json`.
    pub fn settings_path(ctx: &ClientContext, scope: ConfigScope) -> PathBuf {
        let root = match scope {
            ConfigScope::ProjectLocal => &ctx.project_root,
            ConfigScope::Global => &ctx.home_dir,
        };
        root.join(".gemini").join("settings.json")
    }
}

impl HostAdapter for GeminiCliHost {
    fn host(&self) -> TargetHost {
        TargetHost::GeminiCli
    }

    fn register(
        &self,
        ctx: &ClientContext,
        definition: &ServerDefinition,
        scope: ConfigScope,
    ) -> Result<(), HostError> {
        let path = Self::settings_path(ctx, scope);
        upsert_entry_in_field(&path, SERVERS_FIELD, &definition.name, render_server(definition))?;
        tracing::debug!(path = %path.display(), server = %definition.name, "updated Gemini CLI settings");
        Ok(())
    }

    fn remove(
        &self,
        ctx: &ClientContext,
        name: &str,
        scope: ConfigScope,
    ) -> Result<(), HostError> {
        let path = Self::settings_path(ctx, scope);
        match remove_entry_in_field(&path, SERVERS_FIELD, name)? {
            RemoveOutcome::Removed => Ok(()),
            RemoveOutcome::Missing => Err(HostError::NotFound {
                name: name.to_string(),
            }),
        }
    }
}

/// Settings record for one server. `env` is omitted when empty.
pub fn render_server(definition: &ServerDefinition) -> Value {
    let mut record = Map::new();
    record.insert("type".to_string(), json!(definition.transport.kind().as_str()));
    match &definition.transport {
        McpTransport::Stdio { command, args } => {
            record.insert("command".to_string(), json!(command));
            record.insert("args".to_string(), json!(args));
        }
        McpTransport::Http { url } | McpTransport::Sse { url } => {
            record.insert("url".to_string(), json!(url));
        }
    }
    if !definition.env.is_empty() {
        record.insert("env".to_string(), json!(definition.env));
    }
    Value::Object(record)
}
