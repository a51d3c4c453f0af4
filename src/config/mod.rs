//! Configuration management for beey.
//!
//! Connection settings (API root, key, timeout) come from a TOML file in the
//! user's config directory, with `BEEY_*` environment variables taking
//! precedence.

pub mod file;

pub use file::{get_config_path, ApiConfig, BeeyConfig};
