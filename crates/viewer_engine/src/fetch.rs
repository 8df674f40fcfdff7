use std::time::Duration;

use futures_util::StreamExt;
use url::Url;
use viewer_logging::{viewer_debug, viewer_info, viewer_warn};

use crate::decode::{decode_artifact, DecodeError};
use crate::{ArtifactRecord, FailureKind, FetchError, LookupParams};

pub const PARAM_PACKAGE: &str = "pkg";
pub const PARAM_CHANNEL: &str = "channel";
pub const PARAM_ARCHITECTURE: &str = "arch";
pub const PARAM_ARTIFACT_NAME: &str = "name";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Artifact lookup endpoint; the four lookup parameters are appended to it.
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000/api/artifact".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 1024 * 1024,
        }
    }
}

/// Builds the lookup URL. Values are form-urlencoded; all four parameters are always present.
pub fn build_lookup_url(endpoint: &str, params: &LookupParams) -> Result<Url, FetchError> {
    let mut url = Url::parse(endpoint).map_err(|err| {
        FetchError::new(
            FailureKind::InvalidUrl {
                url: endpoint.to_string(),
            },
            err.to_string(),
        )
    })?;
    if url.cannot_be_a_base() {
        return Err(FetchError::new(
            FailureKind::InvalidUrl {
                url: endpoint.to_string(),
            },
            "endpoint cannot carry a query",
        ));
    }
    url.query_pairs_mut()
        .append_pair(PARAM_PACKAGE, &params.package)
        .append_pair(PARAM_CHANNEL, &params.channel)
        .append_pair(PARAM_ARCHITECTURE, &params.architecture)
        .append_pair(PARAM_ARTIFACT_NAME, &params.artifact_name);
    Ok(url)
}

#[async_trait::async_trait]
pub trait ArtifactFetcher: Send + Sync {
    async fn fetch_artifact(&self, params: &LookupParams) -> Result<ArtifactRecord, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ArtifactFetcher for ReqwestFetcher {
    async fn fetch_artifact(&self, params: &LookupParams) -> Result<ArtifactRecord, FetchError> {
        let url = build_lookup_url(&self.settings.endpoint, params)?;
        let client = self.build_client()?;
        viewer_info!("GET {}", url);

        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            viewer_warn!("GET {} returned {}", url, status);
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if bytes.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(too_large(max_bytes));
            }
            bytes.extend_from_slice(&chunk);
        }
        viewer_debug!("GET {} read {} bytes", url, bytes.len());

        decode_artifact(&bytes).map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
    }
}

fn too_large(max_bytes: u64) -> FetchError {
    FetchError::new(
        FailureKind::Decode,
        DecodeError::TooLarge { max_bytes }.to_string(),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> LookupParams {
        LookupParams {
            package: "numpy".into(),
            channel: "conda-forge".into(),
            architecture: "linux-64".into(),
            artifact_name: "numpy-1.24.0-py311.tar.bz2".into(),
        }
    }

    #[test]
    fn lookup_url_carries_all_four_parameters() {
        let url = build_lookup_url("https://meta.test/api/artifact", &params()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://meta.test/api/artifact?pkg=numpy&channel=conda-forge&arch=linux-64&name=numpy-1.24.0-py311.tar.bz2"
        );
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let params = LookupParams {
            package: "a&b=c".into(),
            artifact_name: "x y#z".into(),
            ..LookupParams::default()
        };
        let url = build_lookup_url("https://meta.test/a", &params).unwrap();
        assert_eq!(
            url.query(),
            Some("pkg=a%26b%3Dc&channel=&arch=&name=x+y%23z")
        );
    }

    #[test]
    fn bad_endpoint_is_invalid_url() {
        let err = build_lookup_url("not a url", &params()).unwrap_err();
        assert_eq!(
            err.kind,
            FailureKind::InvalidUrl {
                url: "not a url".into()
            }
        );
    }
}
