use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, open_store, parse_target, print_notifications};
use crate::board::{BoardEngine, CommitQueue};
use crate::cli::OutputOptions;
use crate::error::{BoardError, Result};
use crate::remote::EventFilters;
use crate::types::{DropTarget, EventId};

/// Report a move that left the board untouched
fn nothing_moved(id: &EventId, reason: String, output: OutputOptions) -> Result<()> {
    CommandOutput::new(json!({
        "id": id,
        "moved": false,
        "reason": reason,
    }))
    .with_text(format!("Nothing moved: {reason}").dimmed().to_string())
    .print(output)
}

/// Move an event to a column or before another event.
///
/// An event or target that is not on the board leaves it unchanged.
pub async fn cmd_move(id: &str, target: &str, output: OutputOptions) -> Result<()> {
    let (config, store) = open_store()?;
    let mut engine = BoardEngine::with_config(store, &config);
    engine.load_board(&EventFilters::new()).await?;
    print_notifications(&engine.take_notifications());

    let id = EventId::new(id);
    let Some((from, _)) = engine.board().position_of(&id) else {
        return nothing_moved(&id, format!("event '{id}' is not on the board"), output);
    };
    let target = parse_target(target);
    if let DropTarget::Event(over) = &target
        && engine.locate_column(&target).is_none()
    {
        return nothing_moved(&id, format!("target '{over}' is not on the board"), output);
    }

    let mut failures = Vec::new();
    if let Some(pending) = engine.apply_move(id.clone(), target.clone()) {
        let mut queue = CommitQueue::new();
        queue.submit_move(&engine, &pending);
        failures = queue.settle(&mut engine).await;
    }
    print_notifications(&engine.take_notifications());
    if let Some(err) = failures.into_iter().next() {
        return Err(err);
    }

    let (to, position) = engine
        .board()
        .position_of(&id)
        .ok_or_else(|| BoardError::EventNotFound(id.to_string()))?;

    let json_output = json!({
        "id": id,
        "moved": true,
        "from": from,
        "to": to,
        "position": position,
    });
    let text = if from == to {
        format!(
            "Placed {} at position {} in {}",
            id.cyan(),
            position + 1,
            to.display_name()
        )
    } else {
        format!(
            "Moved {} from {} to {}",
            id.cyan(),
            from.display_name(),
            to.display_name().green()
        )
    };

    CommandOutput::new(json_output).with_text(text).print(output)
}
