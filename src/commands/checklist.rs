use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, open_store};
use crate::checklist::{
    add_item, assign_item, find_item, load_checklist, progress, toggle_item,
};
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::remote::{ChecklistItem, CollaborationStore, EventStore};
use crate::types::{EventId, RecordId};

fn format_item(item: &ChecklistItem) -> String {
    let mark = if item.done {
        "[x]".green().to_string()
    } else {
        "[ ]".to_string()
    };
    let text = if item.done {
        item.text.dimmed().to_string()
    } else {
        item.text.clone()
    };
    let mut line = format!("{} {} {}", mark, format!("{:>4}", item.id.as_str()).cyan(), text);
    if let Some(name) = item.responsible_name() {
        line.push_str(&format!(" {}", format!("@{name}").dimmed()));
    }
    line
}

/// Show an event's checklist, seeding it when empty
pub async fn cmd_checklist_list(event_id: &str, output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;
    let event = store.get_event(&EventId::new(event_id)).await?;
    let items = load_checklist(store.as_ref(), &event).await?;

    let (done, total) = progress(&items);
    let mut text = format!(
        "{} {}\n",
        format!("Checklist for {}", event.title).bold(),
        format!("({done}/{total})").dimmed()
    );
    for item in &items {
        text.push_str(&format!("  {}\n", format_item(item)));
    }

    CommandOutput::new(json!({
        "event_id": event.id,
        "done": done,
        "total": total,
        "items": items,
    }))
    .with_text(text.trim_end().to_string())
    .print(output)
}

/// Add an item to an event's checklist
pub async fn cmd_checklist_add(
    event_id: &str,
    text: &str,
    responsible: Option<&str>,
    output: OutputOptions,
) -> Result<()> {
    let (_, store) = open_store()?;
    let item = add_item(
        store.as_ref(),
        &EventId::new(event_id),
        text,
        responsible.map(RecordId::new),
    )
    .await?;

    CommandOutput::new(json!(item))
        .with_text(format!("Added {}", format_item(&item)))
        .print(output)
}

/// Toggle an item's done flag
pub async fn cmd_checklist_toggle(
    event_id: &str,
    item_id: &str,
    output: OutputOptions,
) -> Result<()> {
    let (_, store) = open_store()?;
    let items = store.list_checklist(&EventId::new(event_id)).await?;
    let item = find_item(&items, &RecordId::new(item_id))?;
    let updated = toggle_item(store.as_ref(), item).await?;

    CommandOutput::new(json!(updated))
        .with_text(format_item(&updated))
        .print(output)
}

/// Assign an item to a user, or clear the assignment
pub async fn cmd_checklist_assign(
    item_id: &str,
    user: Option<&str>,
    output: OutputOptions,
) -> Result<()> {
    let (_, store) = open_store()?;
    let updated = assign_item(
        store.as_ref(),
        &RecordId::new(item_id),
        user.map(RecordId::new),
    )
    .await?;

    let text = match user {
        Some(user) => format!("Assigned {} to user {}", item_id.cyan(), user),
        None => format!("Cleared assignment of {}", item_id.cyan()),
    };
    CommandOutput::new(json!(updated)).with_text(text).print(output)
}

/// Remove a checklist item
pub async fn cmd_checklist_remove(item_id: &str, output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;
    let id = RecordId::new(item_id);
    store.delete_checklist_item(&id).await?;

    CommandOutput::new(json!({ "id": id, "deleted": true }))
        .with_text(format!("Removed checklist item {}", id.cyan()))
        .print(output)
}
