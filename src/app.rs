//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands::{self, TagAction};
use crate::logging;
use crate::transcriber::params::parse_override;
use chrono::{DateTime, Utc};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use serde_json::Value;
use std::io;
use std::path::PathBuf;

/// Command-line client for the Beey transcription service
#[derive(Parser)]
#[command(name = "beey")]
#[command(version)]
#[command(long_about = "Command-line client for the Beey transcription service.\n\nTypical flow:\n    $ beey create \"Morning show\"\n    $ beey upload 42 show.mp3\n    $ beey enqueue 42 --lang en-US\n    $ beey show 42          # repeat until the state is completed\n    $ beey subtitles 42 srt -o show.srt")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/beey/beey.toml\n    Environment:        BEEY_BASE_URI, BEEY_API_KEY, BEEY_TIMEOUT_SECS\n    Logs:               ~/.local/state/beey/beey.log.*"
)]
struct Cli {
    /// Print project records as JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project
    Create {
        /// Project name
        name: String,

        /// Folder path for the project in the Beey UI
        #[arg(long, value_name = "PATH")]
        path: Option<String>,

        /// Scheduled start time (RFC 3339, e.g. 2024-05-01T08:30:00Z)
        #[arg(long, value_name = "TIME", value_parser = parse_timestamp)]
        start: Option<DateTime<Utc>>,
    },

    /// Show the current state of a project
    ///
    /// Reports the state once. Run it again to check on a transcription in progress.
    #[command(visible_alias = "s")]
    Show {
        /// Project ID
        id: i64,
    },

    /// Delete a project
    Delete {
        /// Project ID
        id: i64,
    },

    /// Upload media to a project from a local file or a URL
    ///
    /// Examples:
    ///   beey upload 42 interview.mp3
    ///   beey upload 42 --url https://example.com/interview.mp3
    #[command(visible_alias = "u")]
    Upload {
        /// Project ID
        id: i64,

        /// Local media file
        #[arg(value_name = "FILE", required_unless_present = "url", conflicts_with = "url")]
        file: Option<PathBuf>,

        /// Relay media from this URL without saving it locally
        #[arg(long, value_name = "URL")]
        url: Option<String>,
    },

    /// Start transcription of an uploaded project
    ///
    /// Any enqueue parameter can be overridden with -s KEY=VALUE.
    /// Use KEY=null to leave a default parameter out of the request.
    #[command(visible_alias = "e")]
    Enqueue {
        /// Project ID
        id: i64,

        /// Transcription language (e.g. cs-CZ, en-US)
        #[arg(short, long)]
        lang: Option<String>,

        /// Override a parameter (repeatable)
        #[arg(short = 's', long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
        settings: Vec<(String, Value)>,
    },

    /// Download the project's media file
    Media {
        /// Project ID
        id: i64,

        /// Write to file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Download the project's transcript in TRSX format
    Trsx {
        /// Project ID
        id: i64,

        /// Write to file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List available export formats
    Formats {
        /// List subtitle file formats instead of project export formats
        #[arg(long)]
        subtitles: bool,
    },

    /// List available subtitle variants
    Variants,

    /// Export the transcript as text
    Export {
        /// Project ID
        id: i64,

        /// Export format ID (see `beey formats`)
        #[arg(short, long, value_name = "FORMAT")]
        format: Option<String>,

        /// Write to file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Export subtitles
    ///
    /// Examples:
    ///   beey subtitles 42 srt -o show.srt
    ///   beey subtitles 42 webvtt -s MaxLineLength=32 -s MaxLineCount=1
    Subtitles {
        /// Project ID
        id: i64,

        /// Subtitle file format ID (see `beey formats --subtitles`)
        format: String,

        /// Override a parameter (repeatable)
        #[arg(short = 's', long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
        settings: Vec<(String, Value)>,

        /// Write to file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Manage project tags
    #[command(subcommand)]
    Tag(TagAction),

    /// Show the effective configuration
    Config,

    /// Show recent log entries from the application
    Logs,

    /// Generate shell completion script
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 time '{raw}': {e}"))
}

/// Runs the application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If configuration cannot be loaded
/// - If the Beey request fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Commands that need neither logging nor configuration
    match &cli.command {
        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "beey", &mut io::stdout());
            return Ok(());
        }
        Commands::Logs => return commands::handle_logs(),
        _ => {}
    }

    logging::init_logging()?;

    let json = cli.json;
    let result = match cli.command {
        Commands::Create { name, path, start } => {
            commands::handle_create(name, path, start, json).await
        }
        Commands::Show { id } => commands::handle_show(id, json).await,
        Commands::Delete { id } => commands::handle_delete(id, json).await,
        Commands::Upload { id, file, url } => commands::handle_upload(id, file, url, json).await,
        Commands::Enqueue { id, lang, settings } => {
            commands::handle_enqueue(id, lang, settings, json).await
        }
        Commands::Media { id, output } => commands::handle_media(id, output).await,
        Commands::Trsx { id, output } => commands::handle_trsx(id, output).await,
        Commands::Formats { subtitles } => commands::handle_formats(subtitles).await,
        Commands::Variants => commands::handle_variants().await,
        Commands::Export { id, format, output } => {
            commands::handle_export(id, format, output).await
        }
        Commands::Subtitles {
            id,
            format,
            settings,
            output,
        } => commands::handle_subtitles(id, format, settings, output).await,
        Commands::Tag(action) => commands::handle_tag(action).await,
        Commands::Config => commands::handle_config(),
        Commands::Completions { .. } | Commands::Logs => {
            unreachable!("These commands are handled earlier")
        }
    };

    if let Err(e) = &result {
        tracing::error!("Command failed: {e:#}");
    }
    result
}
