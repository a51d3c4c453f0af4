//! Download project files and exports.

use std::path::PathBuf;

use serde_json::Value;

use super::{collect_overrides, connect, write_output};
use crate::transcriber::ExportFormat;

pub async fn handle_media(id: i64, output: Option<PathBuf>) -> Result<(), anyhow::Error> {
    let client = connect()?;
    let media = client.get_project_media_file(id).await?;
    write_output(&media, output.as_deref())
}

pub async fn handle_trsx(id: i64, output: Option<PathBuf>) -> Result<(), anyhow::Error> {
    let client = connect()?;
    let trsx = client.get_trsx(id).await?;
    write_output(&trsx, output.as_deref())
}

/// Lists project export formats, or subtitle file formats with `subtitles`.
pub async fn handle_formats(subtitles: bool) -> Result<(), anyhow::Error> {
    let client = connect()?;
    let formats = if subtitles {
        client.get_subtitle_export_formats().await?
    } else {
        client.get_export_project_formats().await?
    };
    print!("{}", format_table(&formats));
    Ok(())
}

pub async fn handle_variants() -> Result<(), anyhow::Error> {
    let client = connect()?;
    for variant in client.get_subtitle_export_variants().await? {
        println!("{:<20} {}", variant.id, variant.description);
    }
    Ok(())
}

pub async fn handle_export(
    id: i64,
    format: Option<String>,
    output: Option<PathBuf>,
) -> Result<(), anyhow::Error> {
    let client = connect()?;
    let text = client.export_project(id, format.as_deref()).await?;
    write_output(text.as_bytes(), output.as_deref())
}

pub async fn handle_subtitles(
    id: i64,
    format: String,
    settings: Vec<(String, Value)>,
    output: Option<PathBuf>,
) -> Result<(), anyhow::Error> {
    let client = connect()?;
    let subtitles = client
        .export_subtitles(id, &format, collect_overrides(settings))
        .await?;
    write_output(subtitles.as_bytes(), output.as_deref())
}

fn format_table(formats: &[ExportFormat]) -> String {
    formats
        .iter()
        .map(|f| format!("{:<20} .{:<8} {}\n", f.id, f.extension, f.description))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_table() {
        let formats = vec![ExportFormat {
            id: "srt".to_string(),
            description: "SubRip".to_string(),
            extension: "srt".to_string(),
        }];
        let table = format_table(&formats);
        assert!(table.starts_with("srt"));
        assert!(table.contains(".srt"));
        assert!(table.trim_end().ends_with("SubRip"));
    }
}
