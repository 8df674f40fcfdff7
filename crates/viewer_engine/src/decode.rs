use crate::ArtifactRecord;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{0}")]
    Json(String),
    #[error("response body exceeds {max_bytes} bytes")]
    TooLarge { max_bytes: u64 },
}

/// Decode a response body into an artifact record.
pub fn decode_artifact(bytes: &[u8]) -> Result<ArtifactRecord, DecodeError> {
    serde_json::from_slice(bytes).map_err(|err| DecodeError::Json(err.to_string()))
}
