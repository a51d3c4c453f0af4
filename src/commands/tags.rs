//! Manage project tags.

use clap::Subcommand;

use super::connect;

#[derive(Debug, Subcommand)]
pub enum TagAction {
    /// Add a tag to a project
    Add {
        /// Project ID
        id: i64,
        /// Tag text
        tag: String,
        /// Access token of the project (shown by `beey show`)
        #[arg(long)]
        token: i64,
    },
    /// Remove a tag from a project
    #[command(visible_alias = "rm")]
    Remove {
        /// Project ID
        id: i64,
        /// Tag text
        tag: String,
        /// Access token of the project (shown by `beey show`)
        #[arg(long)]
        token: i64,
    },
    /// List a project's tags
    #[command(visible_alias = "ls")]
    List {
        /// Project ID
        id: i64,
    },
}

pub async fn handle_tag(action: TagAction) -> Result<(), anyhow::Error> {
    let client = connect()?;
    let tags = match action {
        TagAction::Add { id, tag, token } => client.add_tag(id, &tag, token).await?.tags,
        TagAction::Remove { id, tag, token } => client.delete_tag(id, &tag, token).await?.tags,
        TagAction::List { id } => client.get_tags(id).await?,
    };
    for tag in tags {
        println!("{tag}");
    }
    Ok(())
}
