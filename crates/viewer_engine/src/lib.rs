//! Viewer engine: artifact lookups over HTTP and document output.
mod decode;
mod engine;
mod fetch;
mod persist;
mod types;

pub use decode::{decode_artifact, DecodeError};
pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use fetch::{build_lookup_url, ArtifactFetcher, FetchSettings, ReqwestFetcher};
pub use persist::{ensure_output_dir, DocumentWriter, PersistError};
pub use types::{
    ArtifactRecord, ArtifactSpecRecord, EngineEvent, FailureKind, FetchError, LookupParams,
    RequestId,
};
