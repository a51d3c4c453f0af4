//! Application command handlers for beey.
//!
//! Each submodule handles one group of commands and talks to the service
//! through [`TranscriberClient`].
//!
//! # Commands
//! - `project`: create, show, and delete projects
//! - `upload`: upload media from a local file or relay it from a URL
//! - `enqueue`: start transcription with parameter overrides
//! - `export`: download media/TRSX, list export formats, export text and subtitles
//! - `tags`: add, remove, and list project tags
//! - `config`: show the effective configuration
//! - `logs`: display recent log entries

pub mod config;
pub mod enqueue;
pub mod export;
pub mod logs;
pub mod project;
pub mod tags;
pub mod upload;

pub use config::handle_config;
pub use enqueue::handle_enqueue;
pub use export::{
    handle_export, handle_formats, handle_media, handle_subtitles, handle_trsx, handle_variants,
};
pub use logs::handle_logs;
pub use project::{handle_create, handle_delete, handle_show};
pub use tags::{handle_tag, TagAction};
pub use upload::handle_upload;

use std::io::Write;
use std::path::Path;

use crate::config::BeeyConfig;
use crate::transcriber::{Options, Project, TranscriberClient};

/// Loads configuration and builds a client from it.
pub(crate) fn connect() -> anyhow::Result<TranscriberClient> {
    let config = BeeyConfig::load()?;
    let client = TranscriberClient::from_config(&config.api)?;
    tracing::debug!("Connected client for {}", client.base_url());
    Ok(client)
}

/// Writes command output to `output` if given, otherwise to stdout.
pub(crate) fn write_output(content: &[u8], output: Option<&Path>) -> anyhow::Result<()> {
    if let Some(path) = output {
        std::fs::write(path, content)
            .map_err(|e| anyhow::anyhow!("Failed to write to file '{}': {e}", path.display()))?;
        tracing::debug!("Wrote {} bytes to {}", content.len(), path.display());
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(content)?;
        stdout.flush()?;
    }
    Ok(())
}

/// Collects `KEY=VALUE` pairs parsed by clap into an override map.
pub(crate) fn collect_overrides(pairs: Vec<(String, serde_json::Value)>) -> Options {
    pairs.into_iter().collect()
}

/// Prints a project either as a short summary or as its wire JSON.
pub(crate) fn print_project(project: &Project, json: bool) -> anyhow::Result<()> {
    if json {
        let wire = project.to_wire_format()?;
        println!("{}", serde_json::to_string_pretty(&wire)?);
        return Ok(());
    }

    let name = project
        .description
        .as_ref()
        .and_then(|d| d.name.as_deref())
        .unwrap_or("-");
    println!("Project {}: {name}", project.id);
    println!("  State:        {}", project.processing_state);
    if !project.length.is_empty() {
        println!("  Length:       {}", project.length);
    }
    println!("  Access token: {}", project.access_token);
    if let Some(updated) = project.updated {
        println!("  Updated:      {}", updated.to_rfc3339());
    }
    if !project.tags.is_empty() {
        println!("  Tags:         {}", project.tags.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collect_overrides_last_wins() {
        let options = collect_overrides(vec![
            ("Lang".to_string(), json!("en-US")),
            ("Lang".to_string(), json!("de-DE")),
            ("WithVAD".to_string(), json!(false)),
        ]);
        assert_eq!(options.len(), 2);
        assert_eq!(options["Lang"], json!("de-DE"));
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.srt");
        write_output(b"subtitle", Some(&path)).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"subtitle");
    }
}
