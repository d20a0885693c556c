//! Comments on event cards.

use crate::error::{BoardError, Result};
use crate::remote::{CollaborationStore, Comment, NewComment};
use crate::types::{EventId, RecordId};

fn non_blank(text: &str) -> Result<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(BoardError::InvalidInput(
            "comment text cannot be empty".to_string(),
        ));
    }
    Ok(text)
}

/// Post a comment on an event. Blank text is rejected locally.
pub async fn add_comment<S: CollaborationStore>(
    store: &S,
    event_id: &EventId,
    text: &str,
) -> Result<Comment> {
    let text = non_blank(text)?;
    store
        .create_comment(&NewComment {
            event_id: event_id.clone(),
            text: text.to_string(),
        })
        .await
}

/// Replace a comment's text. Blank text is rejected locally.
pub async fn edit_comment<S: CollaborationStore>(
    store: &S,
    id: &RecordId,
    text: &str,
) -> Result<Comment> {
    let text = non_blank(text)?;
    store.update_comment(id, text).await
}

/// Name shown for a comment's author
pub fn author_name(comment: &Comment) -> &str {
    comment
        .author
        .as_ref()
        .map(|a| a.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("Unknown")
}
