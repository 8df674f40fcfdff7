use std::sync::Once;

use pretty_assertions::assert_eq;
use url::Url;
use viewer_core::{
    update, AppState, Artifact, ArtifactSpec, Effect, FetchError, FetchOutcome, LookupRequest,
    Msg, RequestId,
};

const COMPLETE: &str =
    "https://viewer.test/?pkg=numpy&channel=conda-forge&arch=linux-64&name=numpy-1.24.0";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(viewer_logging::initialize_for_tests);
}

fn state_at(raw: &str) -> AppState {
    AppState::new(Url::parse(raw).unwrap())
}

fn numpy() -> Artifact {
    Artifact {
        name: "numpy".into(),
        version: "1.24.0".into(),
        spec: ArtifactSpec {
            path: "/pkgs/numpy-1.24.0.tar.bz2".into(),
        },
    }
}

fn dispatched_id(effects: &[Effect]) -> RequestId {
    match effects {
        [Effect::DispatchFetch { request_id, .. }] => *request_id,
        other => panic!("expected one dispatch, got {other:?}"),
    }
}

#[test]
fn loaded_with_complete_query_dispatches() {
    init_logging();
    let (state, effects) = update(state_at(COMPLETE), Msg::Loaded);

    assert_eq!(
        effects,
        vec![Effect::DispatchFetch {
            request_id: 1,
            request: LookupRequest {
                package: "numpy".into(),
                channel: "conda-forge".into(),
                architecture: "linux-64".into(),
                artifact_name: "numpy-1.24.0".into(),
            },
        }]
    );
    assert_eq!(state.in_flight(), Some(1));
    assert_eq!(state.outcome(), &FetchOutcome::Pending);
}

#[test]
fn loaded_with_partial_query_waits() {
    init_logging();
    let (state, effects) = update(state_at("https://viewer.test/?pkg=numpy"), Msg::Loaded);

    assert!(effects.is_empty());
    assert_eq!(state.in_flight(), None);
}

#[test]
fn explicit_request_sends_empty_strings_for_absent_fields() {
    init_logging();
    let (_state, effects) = update(
        state_at("https://viewer.test/?pkg=numpy"),
        Msg::FetchRequested,
    );

    assert_eq!(
        effects,
        vec![Effect::DispatchFetch {
            request_id: 1,
            request: LookupRequest {
                package: "numpy".into(),
                ..LookupRequest::default()
            },
        }]
    );
}

#[test]
fn success_resolution_is_rendered() {
    init_logging();
    let (state, effects) = update(state_at(COMPLETE), Msg::Loaded);
    let request_id = dispatched_id(&effects);

    let (state, effects) = update(
        state,
        Msg::FetchResolved {
            request_id,
            result: Ok(numpy()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.outcome(), &FetchOutcome::Succeeded(numpy()));
    let text = state.view().body.text();
    assert!(text.contains("numpy v1.24.0"));
    assert!(text.contains("/pkgs/numpy-1.24.0.tar.bz2"));
}

#[test]
fn http_status_failure_shows_code() {
    init_logging();
    let (state, effects) = update(state_at(COMPLETE), Msg::Loaded);
    let request_id = dispatched_id(&effects);

    let (state, _) = update(
        state,
        Msg::FetchResolved {
            request_id,
            result: Err(FetchError::HttpStatus(404)),
        },
    );

    assert_eq!(
        state.outcome(),
        &FetchOutcome::Failed(FetchError::HttpStatus(404))
    );
    assert!(state.view().body.text().contains("404"));
}

#[test]
fn decode_failure_message_is_verbatim() {
    init_logging();
    let message = "missing field `spec` at line 1 column 35";
    let (state, effects) = update(state_at(COMPLETE), Msg::Loaded);
    let request_id = dispatched_id(&effects);

    let (state, _) = update(
        state,
        Msg::FetchResolved {
            request_id,
            result: Err(FetchError::Decode(message.into())),
        },
    );

    assert_eq!(state.view().body.text(), message);
}

#[test]
fn stale_resolution_is_ignored() {
    init_logging();
    let (state, effects) = update(state_at(COMPLETE), Msg::Loaded);
    let first = dispatched_id(&effects);
    let (mut state, effects) = update(state, Msg::FetchRequested);
    let second = dispatched_id(&effects);
    assert!(second > first);
    assert!(state.consume_dirty());

    let (mut state, _) = update(
        state,
        Msg::FetchResolved {
            request_id: first,
            result: Err(FetchError::Timeout),
        },
    );
    assert_eq!(state.outcome(), &FetchOutcome::Pending);
    assert!(!state.consume_dirty());

    let (state, _) = update(
        state,
        Msg::FetchResolved {
            request_id: second,
            result: Ok(numpy()),
        },
    );
    assert_eq!(state.outcome(), &FetchOutcome::Succeeded(numpy()));
    assert_eq!(state.in_flight(), None);
}

#[test]
fn new_dispatch_resets_to_pending() {
    init_logging();
    let (state, effects) = update(state_at(COMPLETE), Msg::Loaded);
    let request_id = dispatched_id(&effects);
    let (state, _) = update(
        state,
        Msg::FetchResolved {
            request_id,
            result: Err(FetchError::NetworkUnreachable),
        },
    );

    let (state, effects) = update(state, Msg::FetchRequested);

    assert_eq!(dispatched_id(&effects), request_id + 1);
    assert_eq!(state.outcome(), &FetchOutcome::Pending);
}
