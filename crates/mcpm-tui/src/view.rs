//! Rendering of each session phase.

use mcpm_core::deploy::RegistrationReport;
use mcpm_core::session::{Phase, ProvisioningSession, SecretForm, SessionError, SessionMode, TargetPicker};
use ratatui::Frame;
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn render(frame: &mut Frame, session: &ProvisioningSession, tick: usize) {
    let title = match session.mode() {
        SessionMode::Install { .. } => " mcpm install ",
        SessionMode::Update { .. } => " mcpm update ",
    };
    let paragraph = Paragraph::new(lines(session, tick))
        .block(Block::bordered().title(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, frame.area());
}

/// Body text for the current phase.
pub fn lines(session: &ProvisioningSession, tick: usize) -> Vec<Line<'static>> {
    match session.phase() {
        Phase::Fetching => vec![busy(tick, format!("Fetching {}...", source_label(session)))],
        Phase::Building => vec![busy(tick, "Analyzing and building project...".to_string())],
        Phase::CollectingSecrets(form) => secret_lines(form),
        Phase::SelectingTargets(picker) => picker_lines(picker),
        Phase::Registering => {
            let name = session.server_name().unwrap_or_default();
            vec![busy(tick, format!("Registering {name}..."))]
        }
        Phase::Done(report) => done_lines(session, report),
        Phase::Errored(err) => error_lines(err),
        Phase::Cancelled => cancelled_lines(session),
    }
}

fn source_label(session: &ProvisioningSession) -> String {
    match session.mode() {
        SessionMode::Install { reference } => reference.url().to_string(),
        SessionMode::Update { name, .. } => name.clone(),
    }
}

fn busy(tick: usize, message: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(SPINNER[tick % SPINNER.len()], Style::default().fg(Color::Magenta)),
        Span::raw(" "),
        Span::raw(message),
    ])
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(text.bold())
}

fn hint(text: &'static str) -> Line<'static> {
    Line::from(text.dark_gray())
}

fn secret_lines(form: &SecretForm) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Configuration Required"), Line::default()];
    for (index, field) in form.fields().iter().enumerate() {
        let focused = index == form.focus();
        let marker = if focused { "> " } else { "  " };
        // Secrets are never echoed.
        let masked = "*".repeat(field.value.chars().count());
        let cursor = if focused { "_" } else { "" };
        let style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{}: ", field.name), style.add_modifier(Modifier::BOLD)),
            Span::styled(format!("{masked}{cursor}"), style),
        ]));
    }
    lines.push(Line::default());
    lines.push(hint("(Tab to switch fields, Enter to confirm, Esc to cancel)"));
    lines
}

fn picker_lines(picker: &TargetPicker) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Select Target Clients"), Line::default()];
    for (index, option) in picker.options().iter().enumerate() {
        let cursor = if index == picker.cursor() { ">" } else { " " };
        let check = if option.selected { "x" } else { " " };
        let text = format!("{cursor} [{check}] {}", picker.label(option));
        let style = if index == picker.cursor() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(text, style)));
    }
    lines.push(Line::default());
    lines.push(hint("(Space to toggle, Enter to install)"));
    lines
}

fn done_lines(session: &ProvisioningSession, report: &RegistrationReport) -> Vec<Line<'static>> {
    let verb = match session.mode() {
        SessionMode::Install { .. } => "installed",
        SessionMode::Update { .. } => "updated",
    };
    if report.outcomes.is_empty() {
        return vec![Line::from(format!(
            "{} was built; no target clients were selected.",
            report.server
        ))];
    }
    let mut lines = vec![Line::from(Span::styled(
        format!("Successfully {verb} and configured {}", report.server),
        Style::default().fg(Color::Green),
    ))];
    lines.extend(succeeded_lines(report));
    lines
}

fn succeeded_lines(report: &RegistrationReport) -> impl Iterator<Item = Line<'static>> + '_ {
    report
        .succeeded()
        .map(|host| Line::from(format!("  ✓ {}", host.display_name())))
}

fn cancelled_lines(session: &ProvisioningSession) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from("Cancelled.".dark_gray())];
    if session.cancelled_during_registration() {
        lines.push(hint(
            "Registration had already started; client settings may have changed.",
        ));
    }
    lines
}

fn error_lines(err: &SessionError) -> Vec<Line<'static>> {
    let message = err.to_string();
    let mut rest = message.lines();
    let headline = rest.next().unwrap_or_default();
    let mut lines = vec![Line::from(Span::styled(
        format!("Error: {headline}"),
        Style::default().fg(Color::Red),
    ))];
    if let SessionError::Registration(report) = err {
        lines.extend(succeeded_lines(report));
    }
    // Shell failures embed their output in the message; print it once.
    let detail: Vec<&str> = match err.output() {
        Some(output) => output.lines().collect(),
        None => rest.collect(),
    };
    if !detail.is_empty() {
        lines.push(Line::default());
        lines.extend(detail.into_iter().map(|line| Line::from(line.to_string())));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use mcpm_core::build::{BuildError, LaunchSpec};
    use mcpm_core::client::{HostError, TargetHost};
    use mcpm_core::session::{KeyInput, SessionEvent};
    use mcpm_core::shell::ShellError;
    use mcpm_core::source::RepoReference;
    use mcpm_core::types::ConfigScope;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn text(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect())
            .collect()
    }

    fn built(required_env: &[&str]) -> ProvisioningSession {
        let mut session = ProvisioningSession::install(
            RepoReference::parse("@acme/weather"),
            ConfigScope::ProjectLocal,
        );
        session.handle(SessionEvent::Fetched(Ok(PathBuf::from("/p/.mcp/servers/weather"))));
        let spec = LaunchSpec::new(
            "node",
            vec!["/p/.mcp/servers/weather/dist/index.js".to_string()],
            required_env.iter().map(|name| name.to_string()).collect(),
        );
        session.handle(SessionEvent::Built(Ok(spec)));
        session
    }

    #[test]
    fn fetching_shows_expanded_url() {
        let session = ProvisioningSession::install(
            RepoReference::parse("@acme/weather"),
            ConfigScope::ProjectLocal,
        );
        let body = text(&lines(&session, 3));
        assert!(body[0].ends_with("Fetching https://github.com/acme/weather.git..."));
    }

    #[test]
    fn secrets_are_masked_and_focus_is_marked() {
        let mut session = built(&["API_KEY", "REGION"]);
        for c in "abc".chars() {
            session.handle(SessionEvent::Key(KeyInput::Char(c)));
        }

        let body = text(&lines(&session, 0));

        assert_eq!(body[0], "Configuration Required");
        assert_eq!(body[2], "> API_KEY: ***_");
        assert_eq!(body[3], "  REGION: ");
        assert!(!body.iter().any(|line| line.contains("abc")));
    }

    #[test]
    fn picker_lists_hosts_with_scope() {
        let mut session = built(&[]);
        session.handle(SessionEvent::Key(KeyInput::Down));
        session.handle(SessionEvent::Key(KeyInput::Char(' ')));

        let body = text(&lines(&session, 0));

        assert_eq!(body[0], "Select Target Clients");
        assert_eq!(body[2], "  [x] Claude Code (Current Dir)");
        assert_eq!(body[3], "> [ ] Gemini CLI (Current Dir)");
        assert_eq!(body[5], "(Space to toggle, Enter to install)");
    }

    #[test]
    fn build_failure_shows_captured_output() {
        let mut session = ProvisioningSession::update(
            "weather",
            PathBuf::from("/p/.mcp/servers/weather"),
            ConfigScope::ProjectLocal,
        );
        let failure = ShellError::Failed {
            command: "npm install".to_string(),
            status: "exit status: 1".to_string(),
            output: "npm ERR! code E404\nnpm ERR! 404 Not Found".to_string(),
        };
        session.handle(SessionEvent::Built(Err(BuildError::Command(failure))));

        let body = text(&lines(&session, 0));

        assert!(body[0].starts_with("Error: Build step failed"));
        assert_eq!(body[2], "npm ERR! code E404");
        assert_eq!(body[3], "npm ERR! 404 Not Found");
    }

    #[test]
    fn done_lists_configured_hosts() {
        let mut session = built(&[]);
        session.handle(SessionEvent::Key(KeyInput::Enter));
        let mut report = RegistrationReport::new("weather");
        report.push(TargetHost::ClaudeCode, Ok(()));
        report.push(TargetHost::GeminiCli, Ok(()));
        session.handle(SessionEvent::Registered(report));

        let body = text(&lines(&session, 0));

        assert_eq!(body[0], "Successfully installed and configured weather");
        assert_eq!(body[1], "  ✓ Claude Code");
        assert_eq!(body[2], "  ✓ Gemini CLI");
    }

    #[test]
    fn partial_failure_renders_host_error() {
        let mut session = built(&[]);
        session.handle(SessionEvent::Key(KeyInput::Enter));
        let mut report = RegistrationReport::new("weather");
        report.push(
            TargetHost::ClaudeCode,
            Err(HostError::Command {
                program: "claude".to_string(),
                output: "not logged in".to_string(),
            }),
        );
        report.push(TargetHost::GeminiCli, Ok(()));
        session.handle(SessionEvent::Registered(report));

        let body = text(&lines(&session, 0));

        assert!(body[0].starts_with("Error: Registration failed for Claude Code"));
        assert_eq!(body[1], "  ✓ Gemini CLI");
        assert_eq!(body.last().map(String::as_str), Some("not logged in"));
    }

    #[test]
    fn cancel_during_registration_warns_about_settings() {
        let mut session = built(&[]);
        session.handle(SessionEvent::Key(KeyInput::Enter));
        session.handle(SessionEvent::Interrupt);

        let body = text(&lines(&session, 0));

        assert_eq!(body[0], "Cancelled.");
        assert!(body[1].contains("client settings may have changed"));

        let mut early = built(&["API_KEY"]);
        early.handle(SessionEvent::Interrupt);
        assert_eq!(text(&lines(&early, 0)), vec!["Cancelled."]);
    }

    #[test]
    fn frame_has_titled_border() {
        let session = built(&["API_KEY"]);
        let mut terminal = Terminal::new(TestBackend::new(50, 8)).unwrap();

        terminal.draw(|frame| render(frame, &session, 0)).unwrap();

        let buffer = terminal.backend().buffer();
        let top: String = (0..buffer.area.width)
            .map(|x| buffer[(x, 0)].symbol().to_string())
            .collect();
        assert!(top.contains("mcpm install"));
        let second: String = (0..buffer.area.width)
            .map(|x| buffer[(x, 1)].symbol().to_string())
            .collect();
        assert!(second.contains("Configuration Required"));
    }
}
