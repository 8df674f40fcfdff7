use url::Url;

use crate::{AppState, Effect, Msg, ParsedQuery};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Loaded => {
            if state.query().is_complete() {
                vec![dispatch(&mut state)]
            } else {
                Vec::new()
            }
        }
        Msg::UrlChanged(raw) => match Url::parse(raw.trim()) {
            Ok(url) => change_url(&mut state, url),
            Err(_) => Vec::new(),
        },
        Msg::LinkClicked { href } => {
            let Ok(target) = state.url().join(href.trim()) else {
                return (state, Vec::new());
            };
            // Opaque origins (file:, data:, about:) never compare equal, so those leave the app.
            if target.origin() == state.url().origin() {
                let url = target.to_string();
                let mut effects = vec![Effect::PushHistory { url }];
                effects.extend(change_url(&mut state, target));
                effects
            } else {
                vec![Effect::NavigateExternal {
                    url: target.to_string(),
                }]
            }
        }
        Msg::FetchRequested => vec![dispatch(&mut state)],
        Msg::FetchResolved { request_id, result } => {
            // Stale resolutions are dropped without touching state.
            state.resolve_fetch(request_id, result);
            Vec::new()
        }
    };

    (state, effects)
}

fn change_url(state: &mut AppState, url: Url) -> Vec<Effect> {
    let previous = state.set_url(url);
    if should_dispatch(&previous, state.query()) {
        vec![dispatch(state)]
    } else {
        Vec::new()
    }
}

fn should_dispatch(previous: &ParsedQuery, current: &ParsedQuery) -> bool {
    current.is_complete() && previous != current
}

fn dispatch(state: &mut AppState) -> Effect {
    let request = state.query().lookup_request();
    let request_id = state.begin_fetch();
    Effect::DispatchFetch {
        request_id,
        request,
    }
}
