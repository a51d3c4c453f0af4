//! Upload media into a project, from disk or relayed from a URL.

use std::path::PathBuf;

use super::{connect, print_project};

/// Uploads either `file` or the media behind `url`; exactly one must be given.
pub async fn handle_upload(
    id: i64,
    file: Option<PathBuf>,
    url: Option<String>,
    json: bool,
) -> Result<(), anyhow::Error> {
    let client = connect()?;

    let project = match (file, url) {
        (Some(file), None) => {
            tracing::info!("Uploading file {} to project {id}", file.display());
            client.upload_media_file(id, &file).await?
        }
        (None, Some(url)) => {
            tracing::info!("Relaying {url} to project {id}");
            client.upload_media_file_from_url(id, &url).await?
        }
        _ => {
            return Err(anyhow::anyhow!(
                "Provide either a FILE or --url, not both"
            ))
        }
    };

    print_project(&project, json)
}
