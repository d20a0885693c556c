use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, open_store};
use crate::cli::OutputOptions;
use crate::comments::{add_comment, author_name, edit_comment};
use crate::error::Result;
use crate::remote::{CollaborationStore, Comment};
use crate::types::{EventId, RecordId};

fn format_comment(comment: &Comment) -> String {
    format!(
        "{} {}: {}",
        format!("{:>4}", comment.id.as_str()).cyan(),
        author_name(comment).bold(),
        comment.text
    )
}

/// Show comments on an event
pub async fn cmd_comments_list(event_id: &str, output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;
    let comments = store.list_comments(&EventId::new(event_id)).await?;

    let text = if comments.is_empty() {
        "No comments".dimmed().to_string()
    } else {
        comments
            .iter()
            .map(format_comment)
            .collect::<Vec<_>>()
            .join("\n")
    };

    CommandOutput::new(json!(comments)).with_text(text).print(output)
}

/// Post a comment
pub async fn cmd_comment_add(event_id: &str, text: &str, output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;
    let comment = add_comment(store.as_ref(), &EventId::new(event_id), text).await?;

    CommandOutput::new(json!(comment))
        .with_text(format!("Added {}", format_comment(&comment)))
        .print(output)
}

/// Replace a comment's text
pub async fn cmd_comment_edit(id: &str, text: &str, output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;
    let comment = edit_comment(store.as_ref(), &RecordId::new(id), text).await?;

    CommandOutput::new(json!(comment))
        .with_text(format_comment(&comment))
        .print(output)
}

/// Remove a comment
pub async fn cmd_comment_remove(id: &str, output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;
    let id = RecordId::new(id);
    store.delete_comment(&id).await?;

    CommandOutput::new(json!({ "id": id, "deleted": true }))
        .with_text(format!("Removed comment {}", id.cyan()))
        .print(output)
}
