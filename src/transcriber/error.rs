//! Error type returned by every Beey client operation.
//!
//! Callers see a single [`Error`] that names the failing operation. The
//! underlying cause is available through [`Error::kind`] for diagnostics.

use std::path::PathBuf;

/// Failure of a single client operation.
#[derive(Debug, thiserror::Error)]
#[error("Beey {operation} failed: {kind}")]
pub struct Error {
    operation: &'static str,
    #[source]
    kind: ErrorKind,
}

/// What went wrong underneath an [`Error`].
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response body: {0}")]
    Body(#[from] serde_json::Error),

    #[error("cannot read local file {}: {source}", path.display())]
    LocalFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source {url} did not declare a content length")]
    MissingContentLength { url: String },

    #[error("source {url} answered with status {status}")]
    SourceStatus { url: String, status: u16 },

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn new(operation: &'static str, kind: impl Into<ErrorKind>) -> Self {
        Self {
            operation,
            kind: kind.into(),
        }
    }

    /// Name of the client operation that failed (e.g. `get_project`).
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// HTTP status code when the service answered with something other than 200.
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::Status { status, .. } => Some(status),
            _ => None,
        }
    }
}
