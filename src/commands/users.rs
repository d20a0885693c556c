use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, open_store};
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::remote::CollaborationStore;

/// List team members
pub async fn cmd_users(output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;
    let users = store.list_users().await?;

    let text = users
        .iter()
        .map(|user| {
            format!(
                "{}  {} {}",
                format!("{:>4}", user.id.as_str()).cyan(),
                user.name,
                user.role.as_deref().unwrap_or("Member").dimmed()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    CommandOutput::new(json!(users)).with_text(text).print(output)
}
