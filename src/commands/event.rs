use owo_colors::OwoColorize;
use serde_json::{Map, Value, json};

use super::{CommandOutput, open_store, print_notifications};
use crate::board::BoardEngine;
use crate::board::search::format_date;
use crate::checklist::EVENT_TYPE_FIELD;
use crate::cli::OutputOptions;
use crate::error::{BoardError, Result};
use crate::remote::{EventStore, NewEvent};
use crate::types::{ColumnId, EventId};

/// Display a single event with all of its fields
pub async fn cmd_show(id: &str, output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;
    let event = store.get_event(&EventId::new(id)).await?;

    let mut text = format!("{} {}\n", event.id.cyan(), event.title.bold());
    let status = match event.column() {
        Some(column) => column.display_name().to_string(),
        None => format!("{} (unknown)", event.status),
    };
    text.push_str(&format!("{}: {}\n", "status".cyan(), status));

    for (key, value) in &event.fields {
        let rendered = match value {
            Value::Null => continue,
            Value::String(s) => format_date(s)
                .filter(|_| key.ends_with("Date"))
                .unwrap_or_else(|| s.clone()),
            other => other.to_string(),
        };
        text.push_str(&format!("{}: {}\n", key.cyan(), rendered));
    }

    CommandOutput::new(serde_json::to_value(&event)?)
        .with_text(text.trim_end().to_string())
        .print(output)
}

/// Create an event and place it on the board
pub async fn cmd_create(
    title: &str,
    status: ColumnId,
    event_type: Option<&str>,
    fields: Vec<(String, String)>,
    output: OutputOptions,
) -> Result<()> {
    if title.trim().is_empty() {
        return Err(BoardError::InvalidInput("event title cannot be empty".to_string()));
    }

    let (config, store) = open_store()?;
    let mut engine = BoardEngine::with_config(store, &config);

    let mut draft = NewEvent::new(title.trim(), status);
    if let Some(event_type) = event_type {
        draft = draft.with_field(EVENT_TYPE_FIELD, event_type);
    }
    for (key, value) in fields {
        draft = draft.with_field(&key, value);
    }

    let created = engine.create_event(&draft).await?;

    let text = format!(
        "Created {} {} in {}",
        created.id.cyan(),
        created.title,
        status.display_name()
    );
    CommandOutput::new(json!(created)).with_text(text).print(output)
}

/// Overwrite fields of an event
pub async fn cmd_edit(
    id: &str,
    fields: Vec<(String, String)>,
    output: OutputOptions,
) -> Result<()> {
    if fields
        .iter()
        .any(|(key, value)| key == "title" && value.trim().is_empty())
    {
        return Err(BoardError::InvalidInput("event title cannot be empty".to_string()));
    }
    let changes: Map<String, Value> = fields
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();

    let (config, store) = open_store()?;
    let mut engine = BoardEngine::with_config(store, &config);
    let id = EventId::new(id);

    let result = engine.update_event(&id, &changes).await;
    print_notifications(&engine.take_notifications());
    let updated = result?;

    let keys: Vec<&str> = changes.keys().map(String::as_str).collect();
    let text = format!("Updated {} ({})", updated.id.cyan(), keys.join(", "));
    CommandOutput::new(json!(updated)).with_text(text).print(output)
}

/// Delete an event
pub async fn cmd_delete(id: &str, output: OutputOptions) -> Result<()> {
    let (config, store) = open_store()?;
    let mut engine = BoardEngine::with_config(store, &config);
    let id = EventId::new(id);

    let result = engine.delete_event(&id).await;
    print_notifications(&engine.take_notifications());
    result?;

    CommandOutput::new(json!({ "id": id, "deleted": true }))
        .with_text(format!("Deleted {}", id.cyan()))
        .print(output)
}
