use crate::{LookupRequest, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Record an in-app navigation as a new history entry.
    PushHistory { url: String },
    /// Issue one lookup against the metadata service.
    DispatchFetch {
        request_id: RequestId,
        request: LookupRequest,
    },
    /// Leave the application with a full-page navigation.
    NavigateExternal { url: String },
}
