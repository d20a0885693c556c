use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, column_header, format_event_line, open_store, print_notifications};
use crate::board::{BoardEngine, filter_board};
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::remote::EventFilters;

/// Print the board, optionally filtered
pub async fn cmd_board(
    search: Option<&str>,
    filters: Vec<(String, String)>,
    output: OutputOptions,
) -> Result<()> {
    let (config, store) = open_store()?;
    let mut engine = BoardEngine::with_config(store, &config);

    let filters: EventFilters = filters.into_iter().collect();
    engine.load_board(&filters).await?;

    print_notifications(&engine.take_notifications());
    let view = filter_board(engine.board(), search.unwrap_or(""));
    let excluded = engine.excluded();

    let json_output = json!({
        "query": view.query,
        "columns": view.columns.iter().map(|c| json!({
            "status": c.column,
            "total": c.total,
            "events": c.events,
        })).collect::<Vec<_>>(),
        "excluded": excluded,
    });

    let mut text = String::new();
    for column in &view.columns {
        text.push_str(&column_header(column.column, column.events.len(), column.total));
        text.push('\n');
        if column.events.is_empty() {
            text.push_str(&format!("  {}\n", "(empty)".dimmed()));
        }
        for event in &column.events {
            text.push_str(&format!("  {}\n", format_event_line(event)));
        }
        text.push('\n');
    }

    if !view.query.is_empty() {
        text.push_str(&format!(
            "{}\n",
            format!(
                "{} of {} events match '{}'",
                view.visible(),
                view.total(),
                view.query
            )
            .dimmed()
        ));
    }

    CommandOutput::new(json_output)
        .with_text(text.trim_end().to_string())
        .print(output)
}
