use crate::{AppState, Artifact, FetchError, FetchOutcome};

pub const APP_TITLE: &str = "Conda Artifact Viewer";

pub const FOOTER_LINKS: [FooterLink; 4] = [
    FooterLink {
        label: "Home",
        href: "https://conda-forge.org",
    },
    FooterLink {
        label: "Docs",
        href: "https://conda-forge.org/docs/",
    },
    FooterLink {
        label: "Twitter",
        href: "https://twitter.com/condaforge",
    },
    FooterLink {
        label: "Donate",
        href: "https://numfocus.org/donate-to-conda-forge",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterLink {
    pub label: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Body {
    /// No lookup has completed yet.
    #[default]
    Empty,
    Artifact { heading: String, path: String },
    Error { message: String },
}

impl Body {
    /// Flattened text of the body region, one line per element.
    pub fn text(&self) -> String {
        match self {
            Body::Empty => String::new(),
            Body::Artifact { heading, path } => format!("{heading}\n{path}"),
            Body::Error { message } => message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTree {
    pub title: &'static str,
    pub body: Body,
    pub footer: &'static [FooterLink],
}

/// Pure projection of the state onto what the page shows.
pub fn render(state: &AppState) -> DisplayTree {
    let body = match state.outcome() {
        FetchOutcome::Pending => Body::Empty,
        FetchOutcome::Succeeded(artifact) => artifact_body(artifact),
        FetchOutcome::Failed(err) => Body::Error {
            message: error_message(err),
        },
    };
    DisplayTree {
        title: APP_TITLE,
        body,
        footer: &FOOTER_LINKS,
    }
}

fn artifact_body(artifact: &Artifact) -> Body {
    Body::Artifact {
        heading: format!("{} v{}", artifact.name, artifact.version),
        path: artifact.spec.path.clone(),
    }
}

/// User-facing message for each fetch failure kind.
pub fn error_message(err: &FetchError) -> String {
    match err {
        FetchError::BadUrl(url) => format!("Invalid request URL: {url}"),
        FetchError::Timeout => "The request timed out.".to_string(),
        FetchError::NetworkUnreachable => "Network unreachable.".to_string(),
        FetchError::HttpStatus(code) => format!("Request failed with status {code}"),
        FetchError::Decode(message) => message.clone(),
    }
}
