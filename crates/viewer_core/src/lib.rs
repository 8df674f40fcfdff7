//! Viewer core: pure state machine, query parsing and the display tree.
mod effect;
mod msg;
mod query;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use query::{
    parse_query, parse_query_str, LookupRequest, ParsedQuery, KEY_ARCHITECTURE,
    KEY_ARTIFACT_NAME, KEY_CHANNEL, KEY_PACKAGE,
};
pub use state::{AppState, Artifact, ArtifactSpec, FetchError, FetchOutcome, RequestId};
pub use update::update;
pub use view_model::{
    error_message, render, Body, DisplayTree, FooterLink, APP_TITLE, FOOTER_LINKS,
};
