use std::fmt;

/// A fetched and decoded listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub encoding_label: String,
    pub html: String,
}

impl RawDocument {
    /// Wraps markup that did not come over the network (fixtures, saved pages).
    pub fn from_html(url: impl Into<String>, html: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            final_url: url.clone(),
            url,
            content_type: Some("text/html".to_string()),
            encoding_label: "UTF-8".to_string(),
            html: html.into(),
        }
    }
}

/// A page could not be fetched; fatal to the current page, never to the process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("fetching {url} failed: {kind}: {message}")]
pub struct FetchError {
    pub url: String,
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(url: &str, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
