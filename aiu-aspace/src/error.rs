//! Error types for aiu-aspace.

use thiserror::Error;

/// All errors that can arise from talking to ArchivesSpace.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A URI that is not of the form `/repositories/<n>/<kind>/<m>`.
    #[error("could not parse URI '{uri}'")]
    InvalidUri { uri: String },

    /// The backend answered 404.
    #[error("ArchivesSpace returned 404 for {url}")]
    NotFound { url: String },

    /// Any other non-2xx answer; `body` carries the backend's message.
    #[error("ArchivesSpace returned {status} for {url}: {body}")]
    Status { status: u16, url: String, body: String },

    /// Connection, DNS, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Login did not yield a session token.
    #[error("login failed for user '{username}': {reason}")]
    Login { username: String, reason: String },

    /// A response body that could not be decoded.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }
}
