//! Cinematerial client error types.

use reqwest::StatusCode;

use crate::imdb::ImdbId;

/// Coarse classification of a [`CinematerialError`].
///
/// Callers branch on the kind instead of matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required input was not supplied at all.
    MissingArgument,
    /// A supplied input is structurally wrong.
    InvalidArgument,
    /// A structurally valid number lies outside its allowed domain.
    OutOfRange,
    /// The request reached the network and failed there.
    RemoteService,
    /// The local HTTP transport could not be set up.
    Configuration,
}

/// Errors returned by the Cinematerial client.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum CinematerialError {
    /// A required argument was never provided.
    #[error("{0} is required")]
    MissingArgument(&'static str),

    /// A required argument was provided but is empty.
    #[error("{0} must not be empty")]
    EmptyArgument(&'static str),

    /// The page address does not identify an IMDb title.
    #[error("address does not identify a title: {url}")]
    InvalidTitleUrl {
        /// The rejected address.
        url: String,
    },

    /// The catalog identifier text is not a number.
    #[error("invalid IMDb movie id: {0:?}")]
    InvalidImdbId(String),

    /// The catalog identifier is zero, negative or too large.
    #[error("IMDb movie id out of range: {0} (must be a positive integer)")]
    ImdbIdOutOfRange(i64),

    /// The image width lies outside the configured bounds.
    #[error("image width out of range: {width} (must be between {min} and {max})")]
    WidthOutOfRange {
        /// The rejected width.
        width: i32,
        /// Inclusive lower bound.
        min: u32,
        /// Inclusive upper bound.
        max: u32,
    },

    /// The service answered with an unexpected HTTP status.
    #[error("Cinematerial API error (HTTP {status}) for {imdb_id}: {body}")]
    Status {
        /// Requested title.
        imdb_id: ImdbId,
        /// Response status.
        status: StatusCode,
        /// Response body, or a placeholder when it could not be read.
        body: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("request failed for {imdb_id}")]
    Transport {
        /// Requested title.
        imdb_id: ImdbId,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// A successful response carried a payload that is not a result.
    #[error("failed to decode JSON response for {imdb_id}")]
    Decode {
        /// Requested title.
        imdb_id: ImdbId,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// The configured base URL cannot carry the request path.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

impl CinematerialError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingArgument(_) => ErrorKind::MissingArgument,
            Self::EmptyArgument(_) | Self::InvalidImdbId(_) | Self::InvalidTitleUrl { .. } => {
                ErrorKind::InvalidArgument
            }
            Self::ImdbIdOutOfRange(_) | Self::WidthOutOfRange { .. } => ErrorKind::OutOfRange,
            Self::Status { .. } | Self::Transport { .. } | Self::Decode { .. } => {
                ErrorKind::RemoteService
            }
            Self::ClientBuild(_) | Self::InvalidBaseUrl(_) => ErrorKind::Configuration,
        }
    }

    /// Returns the HTTP status for [`ErrorKind::RemoteService`] errors that carry one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Returns `true` if the request failed because its deadline elapsed.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_timeout())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, CinematerialError>;
