// Error types for gistlist.
// Covers GitHub API errors, cache store errors, and the collapsed fetch outcome.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GistError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache lock poisoned")]
    LockPoisoned,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, GistError>;

/// Outcome of a failed gist fetch.
///
/// Every variant is rendered the same way (as nothing); the distinction only
/// exists for logging and tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("upstream unreachable: {0}")]
    UpstreamUnavailable(String),

    #[error("upstream returned status {status}")]
    UpstreamError { status: u16 },

    #[error("upstream body could not be parsed: {0}")]
    ParseFailure(String),

    #[error("upstream returned no gists")]
    EmptyResult,

    /// A failure marker was found in the cache; upstream was not contacted.
    #[error("cached failure")]
    Cached,
}

impl From<GistError> for FetchError {
    fn from(err: GistError) -> Self {
        match err {
            GistError::Api(e) if e.is_decode() => FetchError::ParseFailure(e.to_string()),
            GistError::Api(e) => match e.status() {
                Some(status) => FetchError::UpstreamError {
                    status: status.as_u16(),
                },
                None => FetchError::UpstreamUnavailable(e.to_string()),
            },
            GistError::Unauthorized => FetchError::UpstreamError { status: 401 },
            GistError::NotFound(_) => FetchError::UpstreamError { status: 404 },
            GistError::RateLimited { .. } => FetchError::UpstreamError { status: 403 },
            GistError::Status { status, .. } => FetchError::UpstreamError {
                status: status.as_u16(),
            },
            GistError::Json(e) => FetchError::ParseFailure(e.to_string()),
            other => FetchError::UpstreamUnavailable(other.to_string()),
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unknown widget: {0}")]
    UnknownWidget(String),

    #[error("Username is required!")]
    MissingUser,
}
