use url::Url;

use crate::query::{parse_query, ParsedQuery};
use crate::view_model::{render, DisplayTree};

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub path: String,
}

/// Package-metadata record returned by the lookup service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub version: String,
    pub spec: ArtifactSpec,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request URL could not be built; carries the offending URL.
    BadUrl(String),
    Timeout,
    NetworkUnreachable,
    /// Non-2xx response status.
    HttpStatus(u16),
    /// The body could not be decoded; carries the decoder's message.
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchOutcome {
    #[default]
    Pending,
    Succeeded(Artifact),
    Failed(FetchError),
}

/// Everything one running viewer instance knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    url: Url,
    query: ParsedQuery,
    outcome: FetchOutcome,
    last_request_id: RequestId,
    in_flight: Option<RequestId>,
    dirty: bool,
}

impl AppState {
    /// Builds the initial state for the page's starting URL.
    pub fn new(url: Url) -> Self {
        let query = parse_query(&url);
        Self {
            url,
            query,
            outcome: FetchOutcome::Pending,
            last_request_id: 0,
            in_flight: None,
            dirty: true,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn query(&self) -> &ParsedQuery {
        &self.query
    }

    pub fn outcome(&self) -> &FetchOutcome {
        &self.outcome
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    pub fn view(&self) -> DisplayTree {
        render(self)
    }

    /// Returns whether the state changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Replaces the URL and re-derives the query. Returns the previous query.
    pub(crate) fn set_url(&mut self, url: Url) -> ParsedQuery {
        let query = parse_query(&url);
        self.url = url;
        self.dirty = true;
        std::mem::replace(&mut self.query, query)
    }

    /// Allocates a new request id and resets the outcome to pending.
    pub(crate) fn begin_fetch(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.in_flight = Some(self.last_request_id);
        self.outcome = FetchOutcome::Pending;
        self.dirty = true;
        self.last_request_id
    }

    /// Applies a resolution. Returns false (and leaves state untouched) for stale ids.
    pub(crate) fn resolve_fetch(
        &mut self,
        request_id: RequestId,
        result: Result<Artifact, FetchError>,
    ) -> bool {
        if self.in_flight != Some(request_id) {
            return false;
        }
        self.in_flight = None;
        self.outcome = match result {
            Ok(artifact) => FetchOutcome::Succeeded(artifact),
            Err(err) => FetchOutcome::Failed(err),
        };
        self.dirty = true;
        true
    }
}
