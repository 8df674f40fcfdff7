use std::fmt;

use serde::Deserialize;

pub type RequestId = u64;

/// Lookup parameters, already coerced to plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LookupParams {
    pub package: String,
    pub channel: String,
    pub architecture: String,
    pub artifact_name: String,
}

/// Artifact record as served by the metadata service. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtifactRecord {
    pub name: String,
    pub version: String,
    pub spec: ArtifactSpecRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtifactSpecRecord {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    FetchCompleted {
        request_id: RequestId,
        result: Result<ArtifactRecord, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl { url: String },
    Timeout,
    Network,
    HttpStatus(u16),
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl { url } => write!(f, "invalid url {url}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Decode => write!(f, "decode error"),
        }
    }
}
