//! mcpm core library
//!
//! Turns a source repository into a runnable MCP server and registers it with
//! the host tools that consume server definitions (Claude Code, Gemini CLI).
//!
//! The pipeline is split into three layers:
//! - [`build`]: classifies a repository and derives a [`build::LaunchSpec`]
//! - [`session`]: the provisioning state machine driving fetch, build,
//!   secret collection, target selection and registration
//! - [`deploy`]: idempotent upsert/removal of server definitions per host

pub mod build;
pub mod client;
pub mod commands;
pub mod config;
pub mod context;
pub mod deploy;
pub mod git;
pub mod mcp;
pub mod session;
pub mod shell;
pub mod source;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    pub use crate::build::{BuildDetector, BuildError, LaunchSpec, server_identity};
    pub use crate::client::{ClientContext, HostAdapter, TargetHost};
    pub use crate::config::{McpmSettings, SettingsStore};
    pub use crate::context::AppContext;
    pub use crate::deploy::{ConfigInjector, RegistrationError, RegistrationReport};
    pub use crate::mcp::{McpTransport, ServerDefinition};
    pub use crate::session::{Effect, Phase, ProvisioningSession, SessionEvent, SessionServices};
    pub use crate::shell::{CommandRunner, LoginShellRunner, ShellRunner};
    pub use crate::source::RepoReference;
    pub use crate::types::ConfigScope;
}
