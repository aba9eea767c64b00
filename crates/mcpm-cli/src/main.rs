//! mcpm - MCP server installer
//!
//! Usage:
//!   mcpm install @org/repo     # clone, build and register (wizard)
//!   mcpm update [name|--all]   # pull and rebuild installed servers
//!   mcpm add name cmd-or-url   # register an existing server
//!   mcpm remove name           # unregister a server
//!   mcpm list                  # list installed servers

mod output;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcpm_core::commands::{
    AddCommand, AddOptions, InstallCommand, ListCommand, RemoveCommand, RemoveOptions,
    UpdateCommand, hosts_from_flags,
};
use mcpm_core::context::AppContext;
use mcpm_core::mcp::TransportKind;
use mcpm_core::session::ProvisioningSession;
use mcpm_core::types::ConfigScope;

use crate::output::SessionOutcome;

#[derive(Parser)]
#[command(name = "mcpm")]
#[command(about = "Install MCP servers from source and register them with AI clients", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone, build and register an MCP server
    Install {
        /// Repository: @org/repo, gl:@org/repo, gl:rh:@group/repo, or a git URL
        reference: String,
        /// Register in the global client configuration
        #[arg(short, long)]
        global: bool,
    },

    /// Pull and rebuild installed servers
    Update {
        /// Server under .mcp/servers to update
        name: Option<String>,
        /// Update every installed server
        #[arg(short, long, conflicts_with = "name")]
        all: bool,
        /// Register in the global client configuration
        #[arg(short, long)]
        global: bool,
    },

    /// Register an existing server without cloning or building
    Add(AddArgs),

    /// Remove a server from client configuration
    #[command(alias = "rm")]
    Remove {
        /// Server name
        name: String,
        #[command(flatten)]
        hosts: HostFlags,
        /// Remove from the global client configuration
        #[arg(short, long)]
        global: bool,
    },

    /// List servers installed under .mcp/servers
    #[command(alias = "ls")]
    List,
}

#[derive(Args)]
struct AddArgs {
    /// Server name
    name: String,
    /// Command to run (stdio) or server URL (http/sse)
    command_or_url: String,
    /// Arguments passed to the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
    /// Transport type (stdio, http, sse); detected from the URL scheme when omitted
    #[arg(short, long)]
    transport: Option<TransportKind>,
    /// Environment variable for the server
    #[arg(short, long, value_name = "KEY=VALUE")]
    env: Vec<String>,
    #[command(flatten)]
    hosts: HostFlags,
    /// Register in the global client configuration
    #[arg(short, long)]
    global: bool,
}

/// Host selection; neither flag means every host.
#[derive(Args, Clone, Copy)]
struct HostFlags {
    /// Only configure Claude Code
    #[arg(long)]
    claude: bool,
    /// Only configure Gemini CLI
    #[arg(long)]
    gemini: bool,
}

impl AddArgs {
    fn options(&self) -> AddOptions {
        let mut options = AddOptions::new(&self.name, &self.command_or_url);
        options.args = self.args.clone();
        options.transport = self.transport;
        options.env = self.env.clone();
        options.hosts = hosts_from_flags(self.hosts.claude, self.hosts.gemini);
        options.scope = ConfigScope::from_global_flag(self.global);
        options
    }
}

fn main() -> Result<()> {
    // Diagnostics go to stderr; the wizard owns stdout while it runs.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcpm=info,mcpm_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    run(cli.command)
}

fn run(command: Commands) -> Result<()> {
    let ctx = AppContext::with_defaults()?;
    match command {
        Commands::Install { reference, global } => {
            let session = InstallCommand::from_context(&ctx)
                .session(&reference, ConfigScope::from_global_flag(global))?;
            run_wizard(&ctx, session)?;
        }
        Commands::Update { name, all, global } => {
            run_update(&ctx, name.as_deref(), all, ConfigScope::from_global_flag(global))?;
        }
        Commands::Add(args) => {
            let report = AddCommand::from_context(&ctx).execute(&args.options())?;
            output::print_report("Added", &report);
            report.into_result()?;
        }
        Commands::Remove {
            name,
            hosts,
            global,
        } => {
            let mut options = RemoveOptions::new(name);
            options.hosts = hosts_from_flags(hosts.claude, hosts.gemini);
            options.scope = ConfigScope::from_global_flag(global);
            let report = RemoveCommand::from_context(&ctx).execute(&options)?;
            output::print_report("Removed", &report);
            report.into_result()?;
        }
        Commands::List => {
            let servers = ListCommand::from_context(&ctx).execute()?;
            output::print_servers(&servers);
        }
    }
    Ok(())
}

fn run_wizard(ctx: &AppContext, session: ProvisioningSession) -> Result<SessionOutcome> {
    let finished = mcpm_tui::run_session(session, ctx.session_services())?;
    output::finish_session(finished)
}

fn run_update(ctx: &AppContext, name: Option<&str>, all: bool, scope: ConfigScope) -> Result<()> {
    let command = UpdateCommand::from_context(ctx);
    let names = command.targets(name, all)?;
    if !all {
        for name in &names {
            run_wizard(ctx, command.prepare(name, scope)?)?;
        }
        return Ok(());
    }

    if names.is_empty() {
        output::print_no_servers();
        return Ok(());
    }
    let mut failed = Vec::new();
    for name in &names {
        let outcome = command
            .prepare(name, scope)
            .and_then(|session| run_wizard(ctx, session));
        match outcome {
            Ok(SessionOutcome::Completed) => {}
            Ok(SessionOutcome::Cancelled) => break,
            Err(err) => {
                output::print_update_failure(name, &err);
                failed.push(name.as_str());
            }
        }
    }
    if !failed.is_empty() {
        anyhow::bail!(
            "{} of {} servers failed to update: {}",
            failed.len(),
            names.len(),
            failed.join(", ")
        );
    }
    Ok(())
}
