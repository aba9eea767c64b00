use std::sync::Arc;

use super::{Effect, SessionEvent};
use crate::build::BuildDetector;
use crate::deploy::ConfigInjector;
use crate::git::RepoFetcher;

/// Performs session effects. Cheap to clone into background tasks.
#[derive(Debug, Clone)]
pub struct SessionServices {
    fetcher: Arc<dyn RepoFetcher>,
    detector: BuildDetector,
    injector: ConfigInjector,
}

impl SessionServices {
    pub fn new(
        fetcher: Arc<dyn RepoFetcher>,
        detector: BuildDetector,
        injector: ConfigInjector,
    ) -> Self {
        Self {
            fetcher,
            detector,
            injector,
        }
    }

    pub fn fetcher(&self) -> &dyn RepoFetcher {
        self.fetcher.as_ref()
    }

    pub fn injector(&self) -> &ConfigInjector {
        &self.injector
    }

    /// Run `effect` to completion on the calling thread. Blocks on external
    /// processes.
    pub fn perform(&self, effect: Effect) -> SessionEvent {
        match effect {
            Effect::Fetch(reference) => SessionEvent::Fetched(self.fetcher.fetch(&reference)),
            Effect::Build(path) => SessionEvent::Built(self.detector.detect_and_build(&path)),
            Effect::Register(request) => SessionEvent::Registered(self.injector.register(
                &request.launch_spec,
                &request.targets,
                &request.secrets,
                request.scope,
            )),
        }
    }
}
