use std::sync::{mpsc, Arc};

use viewer_core::{Artifact, ArtifactSpec, Effect, FetchError, LookupRequest, Msg};
use viewer_engine::{
    ArtifactFetcher, ArtifactRecord, EngineEvent, EngineHandle, EventSink, FailureKind,
    FetchSettings, LookupParams,
};
use viewer_logging::viewer_info;

use super::app::AppInput;
use super::history::History;

/// Forwards engine completions into the shell's inbox as core messages.
struct InboxSink {
    tx: mpsc::Sender<AppInput>,
}

impl EventSink for InboxSink {
    fn emit(&self, event: EngineEvent) {
        let msg = match event {
            EngineEvent::FetchCompleted { request_id, result } => Msg::FetchResolved {
                request_id,
                result: result.map(map_artifact).map_err(map_error),
            },
        };
        let _ = self.tx.send(AppInput::Msg(msg));
    }
}

/// What the shell must do after a batch of effects has run.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Navigation {
    Stay,
    Leave { url: String },
}

pub(crate) struct EffectRunner {
    engine: EngineHandle,
    history: History,
}

impl EffectRunner {
    pub(crate) fn new(
        settings: FetchSettings,
        start_url: &str,
        inbox: mpsc::Sender<AppInput>,
    ) -> std::io::Result<Self> {
        let engine = EngineHandle::new(settings, Arc::new(InboxSink { tx: inbox }))?;
        Ok(Self::with_engine(engine, start_url))
    }

    #[cfg(test)]
    pub(crate) fn with_fetcher(
        fetcher: Arc<dyn ArtifactFetcher>,
        start_url: &str,
        inbox: mpsc::Sender<AppInput>,
    ) -> std::io::Result<Self> {
        let engine = EngineHandle::with_fetcher(fetcher, Arc::new(InboxSink { tx: inbox }))?;
        Ok(Self::with_engine(engine, start_url))
    }

    fn with_engine(engine: EngineHandle, start_url: &str) -> Self {
        Self {
            engine,
            history: History::new(start_url),
        }
    }

    pub(crate) fn history(&self) -> &History {
        &self.history
    }

    pub(crate) fn run(&mut self, effects: Vec<Effect>) -> Navigation {
        for effect in effects {
            match effect {
                Effect::PushHistory { url } => {
                    viewer_info!("history push {}", url);
                    self.history.push(url);
                }
                Effect::DispatchFetch {
                    request_id,
                    request,
                } => {
                    self.engine.dispatch(request_id, map_request(request));
                }
                Effect::NavigateExternal { url } => {
                    viewer_info!("leaving application for {}", url);
                    return Navigation::Leave { url };
                }
            }
        }
        Navigation::Stay
    }
}

fn map_request(request: LookupRequest) -> LookupParams {
    LookupParams {
        package: request.package,
        channel: request.channel,
        architecture: request.architecture,
        artifact_name: request.artifact_name,
    }
}

fn map_artifact(record: ArtifactRecord) -> Artifact {
    Artifact {
        name: record.name,
        version: record.version,
        spec: ArtifactSpec {
            path: record.spec.path,
        },
    }
}

fn map_error(err: viewer_engine::FetchError) -> FetchError {
    match err.kind {
        FailureKind::InvalidUrl { url } => FetchError::BadUrl(url),
        FailureKind::Timeout => FetchError::Timeout,
        FailureKind::Network => FetchError::NetworkUnreachable,
        FailureKind::HttpStatus(code) => FetchError::HttpStatus(code),
        FailureKind::Decode => FetchError::Decode(err.message),
    }
}
