//! Human-readable command output.

use std::io::{self, Write};

use console::style;
use mcpm_core::commands::InstalledServer;
use mcpm_core::deploy::RegistrationReport;
use mcpm_core::session::{Phase, ProvisioningSession, SessionError, SessionMode};

/// How a wizard run ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    Cancelled,
}

/// Print the final state of a wizard run; an errored session becomes `Err`.
pub fn finish_session(session: ProvisioningSession) -> anyhow::Result<SessionOutcome> {
    write_session(&mut io::stdout(), session)
}

fn write_session<W: Write>(
    writer: &mut W,
    session: ProvisioningSession,
) -> anyhow::Result<SessionOutcome> {
    let verb = match session.mode() {
        SessionMode::Install { .. } => "Installed",
        SessionMode::Update { .. } => "Updated",
    };
    let interrupted_registration = session.cancelled_during_registration();
    let (phase, late_report) = session.into_phase_and_late_report();
    match phase {
        Phase::Done(report) => {
            if report.outcomes.is_empty() {
                writeln!(
                    writer,
                    "{} Built {}; no clients selected, nothing registered",
                    style("!").yellow(),
                    style(&report.server).bold()
                )?;
            } else {
                write_report(writer, verb, &report)?;
            }
            Ok(SessionOutcome::Completed)
        }
        Phase::Cancelled => {
            writeln!(writer, "{}", style("Cancelled").dim())?;
            if let Some(report) = late_report {
                writeln!(writer, "Registration had already started:")?;
                write_outcomes(writer, &report)?;
            } else if interrupted_registration {
                writeln!(
                    writer,
                    "Registration had already started; client settings may have changed"
                )?;
            }
            Ok(SessionOutcome::Cancelled)
        }
        Phase::Errored(SessionError::Registration(report)) => {
            // Hosts that succeeded stay configured; say so before failing.
            write_outcomes(writer, &report)?;
            Err(SessionError::Registration(report).into())
        }
        Phase::Errored(err) => Err(err.into()),
        other => anyhow::bail!("Session stopped in the {} phase", other.name()),
    }
}

/// One line per host, then a summary line.
pub fn print_report(verb: &str, report: &RegistrationReport) {
    // stdout is gone; nothing left to report to.
    let _ = write_report(&mut io::stdout(), verb, report);
}

fn write_report<W: Write>(writer: &mut W, verb: &str, report: &RegistrationReport) -> io::Result<()> {
    write_outcomes(writer, report)?;
    if report.is_success() {
        writeln!(
            writer,
            "{} {} {}",
            style("✓").green().bold(),
            verb,
            style(&report.server).bold()
        )?;
    }
    Ok(())
}

fn write_outcomes<W: Write>(writer: &mut W, report: &RegistrationReport) -> io::Result<()> {
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(()) => writeln!(writer, "  {} {}", style("✓").green(), outcome.host)?,
            Err(err) => writeln!(writer, "  {} {}: {}", style("✗").red(), outcome.host, err)?,
        }
    }
    Ok(())
}

pub fn print_servers(servers: &[InstalledServer]) {
    if servers.is_empty() {
        print_no_servers();
        return;
    }
    let width = servers.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for server in servers {
        println!(
            "  {:width$}  {}",
            style(&server.name).bold(),
            style(server.path.display()).dim(),
        );
    }
}

pub fn print_no_servers() {
    println!("No MCP servers installed in .mcp/servers");
}

pub fn print_update_failure(name: &str, err: &anyhow::Error) {
    eprintln!("{} {}: {:#}", style("✗").red(), style(name).bold(), err);
}
