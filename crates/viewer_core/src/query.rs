use url::Url;

pub const KEY_PACKAGE: &str = "pkg";
pub const KEY_CHANNEL: &str = "channel";
pub const KEY_ARCHITECTURE: &str = "arch";
pub const KEY_ARTIFACT_NAME: &str = "name";

/// The four optional lookup fields carried in a page URL's query string.
///
/// Absence (`None`) is distinct from an empty value (`Some("")`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedQuery {
    pub package: Option<String>,
    pub channel: Option<String>,
    pub architecture: Option<String>,
    pub artifact_name: Option<String>,
}

impl ParsedQuery {
    /// True when every field is present (an empty value still counts as present).
    pub fn is_complete(&self) -> bool {
        self.package.is_some()
            && self.channel.is_some()
            && self.architecture.is_some()
            && self.artifact_name.is_some()
    }

    /// Request parameters for a lookup. Absent fields become empty strings.
    pub fn lookup_request(&self) -> LookupRequest {
        LookupRequest {
            package: self.package.clone().unwrap_or_default(),
            channel: self.channel.clone().unwrap_or_default(),
            architecture: self.architecture.clone().unwrap_or_default(),
            artifact_name: self.artifact_name.clone().unwrap_or_default(),
        }
    }
}

/// Plain-string parameters handed to the fetch dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LookupRequest {
    pub package: String,
    pub channel: String,
    pub architecture: String,
    pub artifact_name: String,
}

/// Extracts the recognized keys from `url`'s query. When a key repeats, the first value wins.
pub fn parse_query(url: &Url) -> ParsedQuery {
    let mut query = ParsedQuery::default();
    for (key, value) in url.query_pairs() {
        let slot = match key.as_ref() {
            KEY_PACKAGE => &mut query.package,
            KEY_CHANNEL => &mut query.channel,
            KEY_ARCHITECTURE => &mut query.architecture,
            KEY_ARTIFACT_NAME => &mut query.artifact_name,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }
    query
}

/// Like [`parse_query`] but for raw text; unparseable input yields an empty query.
pub fn parse_query_str(raw: &str) -> ParsedQuery {
    Url::parse(raw.trim())
        .map(|url| parse_query(&url))
        .unwrap_or_default()
}
