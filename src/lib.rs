//! Client library and command-line tool for the Beey transcription service.
//!
//! The [`transcriber`] module is the library surface: a typed async client
//! over Beey's XAPI v2. The remaining modules make up the `beey` binary.

pub mod app;
pub mod commands;
pub mod config;
pub mod logging;
pub mod transcriber;

pub use transcriber::{Error, Project, ProcessingState, TranscriberClient};
