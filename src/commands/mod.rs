mod board;
mod checklist;
mod comments;
mod config;
mod event;
mod move_event;
mod users;

pub use board::cmd_board;
pub use checklist::{
    cmd_checklist_add, cmd_checklist_assign, cmd_checklist_list, cmd_checklist_remove,
    cmd_checklist_toggle,
};
pub use comments::{cmd_comment_add, cmd_comment_edit, cmd_comment_remove, cmd_comments_list};
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use event::{cmd_create, cmd_delete, cmd_edit, cmd_show};
pub use move_event::cmd_move;
pub use users::cmd_users;

use std::sync::Arc;

use owo_colors::OwoColorize;
use serde_json::Value;

use crate::board::Notification;
use crate::board::search::format_date;
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;
use crate::remote::HttpEventStore;
use crate::types::{ColumnId, DropTarget, Event, EventId};

/// Command result with a JSON form and an optional human-readable form
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print JSON when requested, otherwise the text form (falling back to JSON)
    pub fn print(self, output: OutputOptions) -> Result<()> {
        match (output.json, self.text) {
            (false, Some(text)) => println!("{text}"),
            _ => print_json(&self.json)?,
        }
        Ok(())
    }
}

/// Print a value as pretty JSON
pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Load the configuration and build the REST client it points at
pub(crate) fn open_store() -> Result<(Config, Arc<HttpEventStore>)> {
    let config = Config::load()?;
    let store = HttpEventStore::from_config(&config)?;
    tracing::debug!("Using event API at {}", store.base_url());
    Ok((config, Arc::new(store)))
}

/// Interpret a `move` target: column names and labels first, then event ids
pub(crate) fn parse_target(raw: &str) -> DropTarget {
    match raw.parse::<ColumnId>() {
        Ok(column) => DropTarget::Column(column),
        Err(_) => DropTarget::Event(EventId::new(raw)),
    }
}

/// Colored column header with visible and total card counts
pub(crate) fn column_header(column: ColumnId, visible: usize, total: usize) -> String {
    let count = if visible == total {
        format!("({total})")
    } else {
        format!("({visible}/{total})")
    };
    let name = column.display_name();
    let name = match column {
        ColumnId::Pending => name.yellow().bold().to_string(),
        ColumnId::InProgress => name.cyan().bold().to_string(),
        ColumnId::Completed => name.green().bold().to_string(),
    };
    format!("{name} {}", count.dimmed())
}

/// Format an event for single-line display
pub(crate) fn format_event_line(event: &Event) -> String {
    let id_padded = format!("{:>6}", event.id.as_str());
    let title = if event.title.is_empty() {
        "(untitled)".dimmed().to_string()
    } else {
        event.title.clone()
    };

    let mut details = Vec::new();
    if let Some(start) = event.field_text("startDate").and_then(|d| format_date(&d)) {
        details.push(start);
    }
    if let Some(location) = event.field_text("location").filter(|l| !l.is_empty()) {
        details.push(location);
    }

    if details.is_empty() {
        format!("{}  {}", id_padded.cyan(), title)
    } else {
        format!(
            "{}  {}  {}",
            id_padded.cyan(),
            title,
            details.join(" · ").dimmed()
        )
    }
}

/// Print notifications to stderr
pub(crate) fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        eprintln!("{}", notification.render());
    }
}
