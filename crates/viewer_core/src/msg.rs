#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The page finished loading at the state's starting URL.
    Loaded,
    /// The host changed the page URL (address bar, back/forward).
    UrlChanged(String),
    /// User clicked a link; `href` may be relative to the current URL.
    LinkClicked { href: String },
    /// User asked to look up the current query again.
    FetchRequested,
    /// A dispatched lookup finished.
    FetchResolved {
        request_id: crate::RequestId,
        result: Result<crate::Artifact, crate::FetchError>,
    },
}
