//! Provisioning state machine.
//!
//! The session is pure: it never performs I/O. [`ProvisioningSession::start`]
//! yields the first [`Effect`]; the driver performs it (see
//! [`SessionServices::perform`]) and feeds the outcome back through
//! [`ProvisioningSession::handle`], which applies one transition and may yield
//! the next effect.
//!
//! ```text
//! Fetching ─▶ Building ─▶ CollectingSecrets ─▶ SelectingTargets ─▶ Registering ─▶ Done
//!    │            │              │                    │                 │
//!    └────────────┴──── Errored / Cancelled ──────────┴─────────────────┘
//! ```

mod secrets;
mod services;
mod targets;

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::build::{BuildError, LaunchSpec, server_identity};
use crate::client::TargetHost;
use crate::deploy::RegistrationReport;
use crate::git::FetchError;
use crate::source::RepoReference;
use crate::types::ConfigScope;

pub use secrets::{FormAction, SecretField, SecretForm};
pub use services::SessionServices;
pub use targets::{PickerAction, TargetOption, TargetPicker};

/// Key presses the session understands, already decoded by the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Backspace,
    Tab,
    BackTab,
    Enter,
    Up,
    Down,
}

/// Work the driver must perform on the session's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(RepoReference),
    Build(PathBuf),
    Register(RegisterRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    pub launch_spec: LaunchSpec,
    pub targets: Vec<TargetHost>,
    pub secrets: BTreeMap<String, String>,
    pub scope: ConfigScope,
}

#[derive(Debug)]
pub enum SessionEvent {
    Fetched(Result<PathBuf, FetchError>),
    Built(Result<LaunchSpec, BuildError>),
    Registered(RegistrationReport),
    Key(KeyInput),
    Interrupt,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("Registration failed for {}", failed_hosts(.0))]
    Registration(RegistrationReport),
}

impl SessionError {
    /// Captured process output, for rendering under the message.
    pub fn output(&self) -> Option<&str> {
        match self {
            SessionError::Fetch(err) => err.output(),
            SessionError::Build(err) => err.output(),
            SessionError::Registration(report) => {
                report.failures().find_map(|failure| failure.cause.output())
            }
        }
    }
}

fn failed_hosts(report: &RegistrationReport) -> String {
    report
        .failures()
        .map(|failure| failure.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug)]
pub enum Phase {
    Fetching,
    Building,
    CollectingSecrets(SecretForm),
    SelectingTargets(TargetPicker),
    Registering,
    Done(RegistrationReport),
    Errored(SessionError),
    Cancelled,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done(_) | Phase::Errored(_) | Phase::Cancelled)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Fetching => "fetching",
            Phase::Building => "building",
            Phase::CollectingSecrets(_) => "collecting-secrets",
            Phase::SelectingTargets(_) => "selecting-targets",
            Phase::Registering => "registering",
            Phase::Done(_) => "done",
            Phase::Errored(_) => "errored",
            Phase::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    Install { reference: RepoReference },
    Update { name: String, repo_path: PathBuf },
}

/// What a phase-local handler decided; applied once the phase borrow ends.
enum Transition {
    Stay,
    Fetched(Result<PathBuf, FetchError>),
    Built(Result<LaunchSpec, BuildError>),
    SecretsEntered,
    TargetsConfirmed(Vec<TargetHost>),
    Registered(RegistrationReport),
}

/// One install or update workflow.
#[derive(Debug)]
pub struct ProvisioningSession {
    mode: SessionMode,
    phase: Phase,
    scope: ConfigScope,
    default_targets: Vec<TargetHost>,
    repo_path: Option<PathBuf>,
    launch_spec: Option<LaunchSpec>,
    secret_values: Vec<(String, String)>,
    /// Set when the interrupt arrived while registration was in flight.
    interrupted_registration: bool,
    late_report: Option<RegistrationReport>,
}

impl ProvisioningSession {
    pub fn install(reference: RepoReference, scope: ConfigScope) -> Self {
        Self::new(SessionMode::Install { reference }, Phase::Fetching, None, scope)
    }

    /// Rebuild an existing checkout; fetching is skipped.
    pub fn update(name: impl Into<String>, repo_path: PathBuf, scope: ConfigScope) -> Self {
        let mode = SessionMode::Update {
            name: name.into(),
            repo_path: repo_path.clone(),
        };
        Self::new(mode, Phase::Building, Some(repo_path), scope)
    }

    fn new(
        mode: SessionMode,
        phase: Phase,
        repo_path: Option<PathBuf>,
        scope: ConfigScope,
    ) -> Self {
        Self {
            mode,
            phase,
            scope,
            default_targets: TargetHost::ALL.to_vec(),
            repo_path,
            launch_spec: None,
            secret_values: Vec::new(),
            interrupted_registration: false,
            late_report: None,
        }
    }

    /// Hosts preselected in the target picker.
    pub fn with_default_targets(mut self, targets: Vec<TargetHost>) -> Self {
        self.default_targets = targets;
        self
    }

    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Consume the session, keeping where it ended up and the late report of
    /// a registration that outlived its cancel.
    pub fn into_phase_and_late_report(self) -> (Phase, Option<RegistrationReport>) {
        (self.phase, self.late_report)
    }

    pub fn scope(&self) -> ConfigScope {
        self.scope
    }

    pub fn repo_path(&self) -> Option<&PathBuf> {
        self.repo_path.as_ref()
    }

    pub fn launch_spec(&self) -> Option<&LaunchSpec> {
        self.launch_spec.as_ref()
    }

    pub fn secret_values(&self) -> &[(String, String)] {
        &self.secret_values
    }

    /// Registered name, known once the build succeeded.
    pub fn server_name(&self) -> Option<String> {
        self.launch_spec.as_ref().map(server_identity)
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Cancelled after the register effect was issued. Client settings may
    /// have changed regardless.
    pub fn cancelled_during_registration(&self) -> bool {
        self.interrupted_registration
    }

    /// Whether a cancelled session still expects the in-flight registration
    /// outcome.
    pub fn awaits_late_report(&self) -> bool {
        self.interrupted_registration && self.late_report.is_none()
    }

    /// Outcome of a registration that finished after the cancel.
    pub fn late_report(&self) -> Option<&RegistrationReport> {
        self.late_report.as_ref()
    }

    /// Effect for the initial phase.
    pub fn start(&self) -> Effect {
        match &self.mode {
            SessionMode::Install { reference } => Effect::Fetch(reference.clone()),
            SessionMode::Update { repo_path, .. } => Effect::Build(repo_path.clone()),
        }
    }

    /// Apply one event; events irrelevant to the current phase are dropped.
    pub fn handle(&mut self, event: SessionEvent) -> Option<Effect> {
        if self.phase.is_terminal() {
            match event {
                SessionEvent::Registered(report) if self.awaits_late_report() => {
                    tracing::info!(server = %report.server, "registration finished after cancel");
                    self.late_report = Some(report);
                }
                _ => {
                    tracing::debug!(phase = self.phase.name(), "ignoring event after session ended");
                }
            }
            return None;
        }
        if let SessionEvent::Interrupt = event {
            tracing::info!(phase = self.phase.name(), "session cancelled");
            self.interrupted_registration = matches!(self.phase, Phase::Registering);
            self.phase = Phase::Cancelled;
            return None;
        }

        let transition = match (&mut self.phase, event) {
            (Phase::Fetching, SessionEvent::Fetched(result)) => Transition::Fetched(result),
            (Phase::Building, SessionEvent::Built(result)) => Transition::Built(result),
            (Phase::CollectingSecrets(form), SessionEvent::Key(key)) => {
                match form.handle_key(key) {
                    FormAction::Submit => Transition::SecretsEntered,
                    FormAction::Continue => Transition::Stay,
                }
            }
            (Phase::SelectingTargets(picker), SessionEvent::Key(key)) => {
                match picker.handle_key(key) {
                    PickerAction::Confirm => Transition::TargetsConfirmed(picker.selected()),
                    PickerAction::Continue => Transition::Stay,
                }
            }
            (Phase::Registering, SessionEvent::Registered(report)) => {
                Transition::Registered(report)
            }
            (phase, event) => {
                tracing::debug!(phase = phase.name(), ?event, "dropping irrelevant event");
                Transition::Stay
            }
        };

        self.apply(transition)
    }

    fn apply(&mut self, transition: Transition) -> Option<Effect> {
        match transition {
            Transition::Stay => None,
            Transition::Fetched(Ok(path)) => {
                self.repo_path = Some(path.clone());
                self.enter(Phase::Building);
                Some(Effect::Build(path))
            }
            Transition::Fetched(Err(err)) => self.fail(err.into()),
            Transition::Built(Ok(spec)) => {
                let next = if spec.required_env().is_empty() {
                    self.picker_phase()
                } else {
                    Phase::CollectingSecrets(SecretForm::new(spec.required_env()))
                };
                self.launch_spec = Some(spec);
                self.enter(next);
                None
            }
            Transition::Built(Err(err)) => self.fail(err.into()),
            Transition::SecretsEntered => {
                let next = self.picker_phase();
                let previous = std::mem::replace(&mut self.phase, next);
                tracing::info!(from = previous.name(), to = self.phase.name(), "phase transition");
                if let Phase::CollectingSecrets(form) = previous {
                    self.secret_values = form.into_values();
                }
                None
            }
            Transition::TargetsConfirmed(targets) => {
                let launch_spec = self.launch_spec.clone()?;
                let secrets = self.resolve_secrets(&launch_spec);
                self.enter(Phase::Registering);
                Some(Effect::Register(RegisterRequest {
                    launch_spec,
                    targets,
                    secrets,
                    scope: self.scope,
                }))
            }
            Transition::Registered(report) => {
                if report.is_success() {
                    self.enter(Phase::Done(report));
                    None
                } else {
                    self.fail(SessionError::Registration(report))
                }
            }
        }
    }

    fn picker_phase(&self) -> Phase {
        Phase::SelectingTargets(TargetPicker::new(&self.default_targets, self.scope))
    }

    /// Every required name gets a value; unanswered ones are empty.
    fn resolve_secrets(&self, spec: &LaunchSpec) -> BTreeMap<String, String> {
        spec.required_env()
            .iter()
            .map(|name| {
                let value = self
                    .secret_values
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| value.clone())
                    .unwrap_or_default();
                (name.clone(), value)
            })
            .collect()
    }

    fn enter(&mut self, phase: Phase) {
        tracing::info!(from = self.phase.name(), to = phase.name(), "phase transition");
        self.phase = phase;
    }

    fn fail(&mut self, err: SessionError) -> Option<Effect> {
        tracing::warn!(phase = self.phase.name(), "session failed: {}", err);
        self.phase = Phase::Errored(err);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_with_env(env: &[&str]) -> LaunchSpec {
        LaunchSpec::new(
            "node",
            vec!["/p/.mcp/servers/weather/dist/index.js".to_string()],
            env.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn install_starts_with_fetch_and_update_with_build() {
        let install = ProvisioningSession::install(
            RepoReference::parse("@acme/weather"),
            ConfigScope::ProjectLocal,
        );
        assert!(matches!(install.start(), Effect::Fetch(_)));
        assert!(matches!(install.phase(), Phase::Fetching));

        let update = ProvisioningSession::update(
            "weather",
            PathBuf::from("/p/.mcp/servers/weather"),
            ConfigScope::Global,
        );
        assert_eq!(
            update.start(),
            Effect::Build(PathBuf::from("/p/.mcp/servers/weather"))
        );
        assert!(matches!(update.phase(), Phase::Building));
    }

    #[test]
    fn build_without_env_skips_secret_collection() {
        let mut session =
            ProvisioningSession::update("weather", PathBuf::from("/p"), ConfigScope::ProjectLocal);

        let effect = session.handle(SessionEvent::Built(Ok(spec_with_env(&[]))));

        assert!(effect.is_none());
        assert!(matches!(session.phase(), Phase::SelectingTargets(_)));
    }

    #[test]
    fn unanswered_secrets_resolve_to_empty() {
        let mut session =
            ProvisioningSession::update("weather", PathBuf::from("/p"), ConfigScope::ProjectLocal);
        session.handle(SessionEvent::Built(Ok(spec_with_env(&["A", "B"]))));
        session.handle(SessionEvent::Key(KeyInput::Char('x')));
        session.handle(SessionEvent::Key(KeyInput::Enter));
        session.handle(SessionEvent::Key(KeyInput::Enter));

        let effect = session.handle(SessionEvent::Key(KeyInput::Enter)).unwrap();

        let Effect::Register(request) = effect else {
            panic!("expected register effect");
        };
        assert_eq!(request.secrets.get("A").map(String::as_str), Some("x"));
        assert_eq!(request.secrets.get("B").map(String::as_str), Some(""));
    }

    #[test]
    fn stray_events_are_dropped() {
        let mut session =
            ProvisioningSession::update("weather", PathBuf::from("/p"), ConfigScope::ProjectLocal);

        assert!(session.handle(SessionEvent::Key(KeyInput::Enter)).is_none());
        assert!(session
            .handle(SessionEvent::Fetched(Ok(PathBuf::from("/elsewhere"))))
            .is_none());
        assert!(matches!(session.phase(), Phase::Building));
    }

    #[test]
    fn late_report_is_only_kept_after_a_cancelled_registration() {
        let mut building =
            ProvisioningSession::update("weather", PathBuf::from("/p"), ConfigScope::ProjectLocal);
        building.handle(SessionEvent::Interrupt);
        building.handle(SessionEvent::Registered(RegistrationReport::new("weather")));
        assert!(!building.cancelled_during_registration());
        assert!(building.late_report().is_none());

        let mut registering =
            ProvisioningSession::update("weather", PathBuf::from("/p"), ConfigScope::ProjectLocal);
        registering.handle(SessionEvent::Built(Ok(spec_with_env(&[]))));
        assert!(registering.handle(SessionEvent::Key(KeyInput::Enter)).is_some());
        registering.handle(SessionEvent::Interrupt);
        assert!(registering.awaits_late_report());

        registering.handle(SessionEvent::Registered(RegistrationReport::new("weather")));
        assert_eq!(registering.late_report().map(|r| r.server.as_str()), Some("weather"));
        assert!(matches!(registering.phase(), Phase::Cancelled));
    }
}
