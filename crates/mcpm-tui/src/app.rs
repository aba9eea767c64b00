use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Context;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use mcpm_core::session::{Effect, ProvisioningSession, SessionEvent, SessionServices};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::runtime::{Handle, Runtime};
use tokio::sync::mpsc;

use crate::{keys, view};

/// Redraw interval; also paces the spinner.
const TICK: Duration = Duration::from_millis(100);

/// Run `session` to a terminal phase and hand it back.
///
/// The terminal is restored before returning, so callers print the outcome
/// into the normal screen.
pub fn run_session(
    mut session: ProvisioningSession,
    services: SessionServices,
) -> anyhow::Result<ProvisioningSession> {
    let runtime = Runtime::new().context("Failed to start worker runtime")?;
    let (tx, mut rx) = mpsc::channel(1);
    let driver = EffectDriver {
        handle: runtime.handle().clone(),
        services,
        tx,
    };

    let result = TerminalSession::enter().and_then(|mut terminal| {
        driver.spawn(session.start());
        event_loop(&mut terminal, &mut session, &driver, &mut rx)
    });

    // An interrupted registration finishes its settings writes first.
    if result.is_ok() && session.awaits_late_report() {
        tracing::info!("waiting for the in-flight registration to finish");
        if let Some(completion) = rx.blocking_recv() {
            session.handle(completion);
        }
    }
    // A cancelled session may leave a build running; don't wait for it.
    runtime.shutdown_background();
    result.map(|()| session)
}

fn event_loop(
    terminal: &mut TerminalSession,
    session: &mut ProvisioningSession,
    driver: &EffectDriver,
    rx: &mut mpsc::Receiver<SessionEvent>,
) -> anyhow::Result<()> {
    let mut tick = 0usize;
    loop {
        terminal
            .terminal
            .draw(|frame| view::render(frame, session, tick))?;
        if session.is_finished() {
            return Ok(());
        }

        while let Ok(completion) = rx.try_recv() {
            dispatch(session, driver, completion);
        }

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if let Some(input) = keys::translate(key) {
                    dispatch(session, driver, input.into_event());
                }
            }
        }
        tick = tick.wrapping_add(1);
    }
}

fn dispatch(session: &mut ProvisioningSession, driver: &EffectDriver, event: SessionEvent) {
    if let Some(effect) = session.handle(event) {
        driver.spawn(effect);
    }
}

/// Performs effects on the blocking pool and posts the completions back.
struct EffectDriver {
    handle: Handle,
    services: SessionServices,
    tx: mpsc::Sender<SessionEvent>,
}

impl EffectDriver {
    fn spawn(&self, effect: Effect) {
        let services = self.services.clone();
        let tx = self.tx.clone();
        self.handle.spawn_blocking(move || {
            let completion = services.perform(effect);
            if tx.blocking_send(completion).is_err() {
                tracing::debug!("session ended before completion was delivered");
            }
        });
    }
}

/// Raw-mode alternate screen, restored on drop.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn enter() -> anyhow::Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
