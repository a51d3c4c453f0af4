//! Typed client for the Beey transcription API (XAPI v2).
//!
//! [`TranscriberClient`] exposes one async method per API operation and
//! returns [`Project`] records, descriptor lists, or raw exported content.
//! Every failure surfaces as a single [`Error`] naming the operation.
//!
//! The client does not wait for transcription to finish. Poll
//! [`TranscriberClient::get_project`] and check [`ProcessingState`].

mod client;
mod error;
mod export;
pub mod params;
mod project;
mod relay;
mod state;
pub mod transport;

pub use client::TranscriberClient;
pub use error::{Error, ErrorKind};
pub use export::{ExportFormat, SubtitleVariant};
pub use params::Options;
pub use project::{KeywordHighlight, MediaInfo, Project, ProjectDescription};
pub use relay::RelayBody;
pub use state::ProcessingState;
