//! Create, inspect, and delete projects.

use chrono::{DateTime, Utc};

use super::{connect, print_project};

/// Creates a project and prints it.
pub async fn handle_create(
    name: String,
    custom_path: Option<String>,
    start: Option<DateTime<Utc>>,
    json: bool,
) -> Result<(), anyhow::Error> {
    let client = connect()?;
    let project = client
        .add_project(&name, custom_path.as_deref(), start)
        .await?;
    print_project(&project, json)
}

/// Prints the current state of a project once. Does not wait for transcription.
pub async fn handle_show(id: i64, json: bool) -> Result<(), anyhow::Error> {
    let client = connect()?;
    match client.get_project(id).await? {
        Some(project) => {
            print_project(&project, json)?;
            if !json && !project.processing_state.is_finished() {
                println!("  (not finished yet; run `beey show {id}` again later)");
            }
            Ok(())
        }
        None => Err(anyhow::anyhow!("Project {id} not found")),
    }
}

pub async fn handle_delete(id: i64, json: bool) -> Result<(), anyhow::Error> {
    let client = connect()?;
    let project = client.delete_project(id).await?;
    if json {
        print_project(&project, true)
    } else {
        println!("Deleted project {}", project.id);
        Ok(())
    }
}
