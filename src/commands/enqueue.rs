//! Start transcription of an uploaded project.

use serde_json::Value;

use super::{collect_overrides, connect, print_project};

/// Enqueues a project. `--lang` is shorthand for `-s Lang=<code>` and wins over it.
pub async fn handle_enqueue(
    id: i64,
    lang: Option<String>,
    settings: Vec<(String, Value)>,
    json: bool,
) -> Result<(), anyhow::Error> {
    let mut overrides = collect_overrides(settings);
    if let Some(lang) = lang {
        overrides.insert("Lang".to_string(), Value::String(lang));
    }
    tracing::debug!("Enqueue overrides: {:?}", overrides);

    let client = connect()?;
    let project = client.enqueue_project(id, overrides).await?;
    print_project(&project, json)
}
