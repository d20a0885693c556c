//! Text search over the board.
//!
//! Filtering produces a [`BoardView`]; the board itself is never modified and
//! column order is preserved.

use std::sync::Arc;

use jiff::civil::{Date, DateTime};
use jiff::Timestamp;
use jiff::tz::TimeZone;
use serde::Serialize;

use crate::board::model::BoardState;
use crate::types::{COLUMNS, ColumnId, Event};

/// Free-form fields matched by the search query, besides the title
pub const SEARCH_FIELDS: &[&str] = &[
    "description",
    "responsible",
    "eventType",
    "eventFormat",
    "organizer",
    "location",
    "costCenter",
    "requester",
];

/// Date fields matched in `dd/mm/yyyy` form
pub const DATE_FIELDS: &[&str] = &["startDate", "endDate"];

/// Filtered, read-only projection of a board
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub query: String,
    pub columns: Vec<ColumnView>,
}

/// Visible cards of one column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnView {
    pub column: ColumnId,
    pub events: Vec<Arc<Event>>,
    /// Number of cards in the column before filtering
    pub total: usize,
}

impl BoardView {
    pub fn column(&self, column: ColumnId) -> &ColumnView {
        &self.columns[column.index()]
    }

    /// Number of cards visible across all columns
    pub fn visible(&self) -> usize {
        self.columns.iter().map(|c| c.events.len()).sum()
    }

    /// Number of cards on the underlying board
    pub fn total(&self) -> usize {
        self.columns.iter().map(|c| c.total).sum()
    }
}

/// Filter the board down to cards matching `query`.
///
/// Matching is a case-insensitive substring test against the title, the
/// descriptive fields in [`SEARCH_FIELDS`] and the rendered dates. An empty
/// or whitespace-only query matches everything.
pub fn filter_board(state: &BoardState, query: &str) -> BoardView {
    let needle = query.trim().to_lowercase();

    let columns = COLUMNS
        .iter()
        .map(|&column| {
            let cards = state.column(column);
            ColumnView {
                column,
                events: cards
                    .iter()
                    .filter(|event| needle.is_empty() || matches_query(event, &needle))
                    .cloned()
                    .collect(),
                total: cards.len(),
            }
        })
        .collect();

    BoardView {
        query: query.trim().to_string(),
        columns,
    }
}

/// Whether an event matches an already-lowercased query
pub fn matches_query(event: &Event, needle: &str) -> bool {
    if event.title.to_lowercase().contains(needle) {
        return true;
    }

    let text_hit = SEARCH_FIELDS
        .iter()
        .filter_map(|field| event.field_text(field))
        .any(|value| value.to_lowercase().contains(needle));
    if text_hit {
        return true;
    }

    DATE_FIELDS
        .iter()
        .filter_map(|field| event.field_text(field))
        .filter_map(|raw| format_date(&raw))
        .any(|date| date.contains(needle))
}

/// Render an API date as `dd/mm/yyyy`.
///
/// Accepts RFC 3339 timestamps (rendered in UTC), civil datetimes and plain
/// dates. Returns `None` for anything else.
pub fn format_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let date = if let Ok(ts) = raw.parse::<Timestamp>() {
        ts.to_zoned(TimeZone::UTC).date()
    } else if let Ok(dt) = raw.parse::<DateTime>() {
        dt.date()
    } else {
        raw.parse::<Date>().ok()?
    };
    Some(date.strftime("%d/%m/%Y").to_string())
}
