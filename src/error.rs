use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One self-contained extraction run over a parsed page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    Content,
    Images,
    Videos,
    Links,
}

impl Pass {
    pub const ALL: [Pass; 4] = [Pass::Content, Pass::Images, Pass::Videos, Pass::Links];
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pass::Content => "content",
            Pass::Images => "images",
            Pass::Videos => "videos",
            Pass::Links => "links",
        };
        f.write_str(name)
    }
}

/// Failure to retrieve a page over HTTP
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// The fetched bytes could not be turned into a traversable page
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("origin URL `{url}` is not absolute: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// What went wrong inside a single pass
#[derive(Debug, Error)]
pub enum ExtractionCause {
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A failed extraction pass. Scoped to that pass only.
#[derive(Debug, Error)]
#[error("{pass} extraction failed for {url}: {cause}")]
pub struct ExtractionError {
    pub pass: Pass,
    pub url: String,
    #[source]
    pub cause: ExtractionCause,
}

impl ExtractionError {
    pub fn new(pass: Pass, url: &url::Url, cause: impl Into<ExtractionCause>) -> Self {
        Self {
            pass,
            url: url.to_string(),
            cause: cause.into(),
        }
    }
}

/// Failure while saving a download or an exported document
#[derive(Debug, Error)]
pub enum TransferError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TransferError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Request-level failure: nothing could be extracted at all
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
