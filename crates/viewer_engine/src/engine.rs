use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use viewer_logging::{viewer_debug, viewer_info, viewer_warn};

use crate::fetch::{ArtifactFetcher, FetchSettings, ReqwestFetcher};
use crate::{EngineEvent, LookupParams, RequestId};

/// Receives engine events on the engine's worker threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    Lookup {
        request_id: RequestId,
        params: LookupParams,
    },
}

/// Runs lookups on a background tokio runtime. Dispatch never blocks the caller.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings, sink: Arc<dyn EventSink>) -> io::Result<Self> {
        Self::with_fetcher(Arc::new(ReqwestFetcher::new(settings)), sink)
    }

    pub fn with_fetcher(
        fetcher: Arc<dyn ArtifactFetcher>,
        sink: Arc<dyn EventSink>,
    ) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let fetcher = fetcher.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    handle_command(fetcher.as_ref(), command, sink.as_ref()).await;
                });
            }
            viewer_debug!("engine command channel closed");
        });

        Ok(Self { cmd_tx })
    }

    /// Queues one lookup. In-flight lookups are never cancelled.
    pub fn dispatch(&self, request_id: RequestId, params: LookupParams) {
        viewer_info!("dispatch request_id={} pkg={}", request_id, params.package);
        if self
            .cmd_tx
            .send(EngineCommand::Lookup { request_id, params })
            .is_err()
        {
            viewer_warn!("engine stopped; dropping request_id={}", request_id);
        }
    }
}

async fn handle_command(fetcher: &dyn ArtifactFetcher, command: EngineCommand, sink: &dyn EventSink) {
    match command {
        EngineCommand::Lookup { request_id, params } => {
            let result = fetcher.fetch_artifact(&params).await;
            if let Err(err) = &result {
                viewer_warn!("request_id={} failed: {}", request_id, err);
            }
            sink.emit(EngineEvent::FetchCompleted { request_id, result });
        }
    }
}
