use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::BoardError;

/// Directory holding local configuration, relative to the working directory
pub const BOARD_DIR: &str = ".eventboard";

/// Resolve the configuration root, honoring `EVENTBOARD_ROOT` when set
pub fn board_root() -> std::path::PathBuf {
    if let Ok(root) = std::env::var("EVENTBOARD_ROOT")
        && !root.is_empty()
    {
        return std::path::PathBuf::from(root);
    }
    std::path::PathBuf::from(BOARD_DIR)
}

/// Opaque, stable identifier for API records (events, checklist items,
/// comments, users).
///
/// The API hands out identifiers either as JSON numbers or as strings. Both
/// forms compare by their canonical text, and serialize back the way they
/// arrived.
#[derive(Debug, Clone, Eq)]
pub struct RecordId {
    text: String,
    numeric: bool,
}

/// Identifier of an event card
pub type EventId = RecordId;

impl RecordId {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            numeric: false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Hash for RecordId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::new(s)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::new(s)
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self {
            text: n.to_string(),
            numeric: true,
        }
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.numeric
            && let Ok(n) = self.text.parse::<i64>()
        {
            return serializer.serialize_i64(n);
        }
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum WireId {
            Int(i64),
            UInt(u64),
            Text(String),
        }

        Ok(match WireId::deserialize(deserializer)? {
            WireId::Int(n) => RecordId::from(n),
            WireId::UInt(n) => RecordId {
                text: n.to_string(),
                numeric: true,
            },
            WireId::Text(s) => RecordId::new(s),
        })
    }
}

/// The three fixed board columns, one per event status.
///
/// Serialized as the exact status strings the API stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnId {
    #[serde(rename = "Aguardando", alias = "pending")]
    Pending,
    #[serde(rename = "Em Andamento", alias = "in_progress")]
    InProgress,
    #[serde(rename = "Concluído", alias = "completed")]
    Completed,
}

/// Columns in on-screen order
pub const COLUMNS: [ColumnId; 3] = [ColumnId::Pending, ColumnId::InProgress, ColumnId::Completed];

/// Column display names
pub const COLUMN_NAMES: [&str; 3] = ["PENDING", "IN PROGRESS", "COMPLETED"];

/// Accepted spellings for the `move` command and config files
pub const VALID_COLUMNS: &[&str] = &["pending", "in_progress", "completed"];

impl ColumnId {
    /// The exact status string stored by the API
    pub fn wire_label(self) -> &'static str {
        match self {
            ColumnId::Pending => "Aguardando",
            ColumnId::InProgress => "Em Andamento",
            ColumnId::Completed => "Concluído",
        }
    }

    /// Match a raw status string against the wire labels (exact, case-sensitive)
    pub fn from_wire(label: &str) -> Option<Self> {
        COLUMNS.into_iter().find(|c| c.wire_label() == label)
    }

    /// Position of this column on the board
    pub fn index(self) -> usize {
        match self {
            ColumnId::Pending => 0,
            ColumnId::InProgress => 1,
            ColumnId::Completed => 2,
        }
    }

    pub fn display_name(self) -> &'static str {
        COLUMN_NAMES[self.index()]
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_label())
    }
}

impl FromStr for ColumnId {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(column) = ColumnId::from_wire(s) {
            return Ok(column);
        }
        match s.to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(ColumnId::Pending),
            "in_progress" => Ok(ColumnId::InProgress),
            "completed" => Ok(ColumnId::Completed),
            _ => Err(BoardError::InvalidStatus(s.to_string())),
        }
    }
}

/// Where a drag gesture was released: a column body or another card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Column(ColumnId),
    Event(EventId),
}

impl DropTarget {
    /// Interpret a raw drop-zone id. Column labels win over event ids so an
    /// emptied column is always reachable.
    pub fn parse(raw: &str) -> Self {
        match ColumnId::from_wire(raw) {
            Some(column) => DropTarget::Column(column),
            None => DropTarget::Event(EventId::new(raw)),
        }
    }
}

impl From<ColumnId> for DropTarget {
    fn from(column: ColumnId) -> Self {
        DropTarget::Column(column)
    }
}

impl From<EventId> for DropTarget {
    fn from(id: EventId) -> Self {
        DropTarget::Event(id)
    }
}

impl fmt::Display for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropTarget::Column(column) => write!(f, "column '{column}'"),
            DropTarget::Event(id) => write!(f, "event '{id}'"),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// An event record as served by the API.
///
/// Only `id`, `title` and `status` are interpreted by the board. Every other
/// property (dates, owner, location, budget...) is carried verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Raw status string; may hold values outside the three known columns
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Event {
    pub fn new(id: impl Into<EventId>, title: impl Into<String>, column: ColumnId) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: column.wire_label().to_string(),
            fields: Map::new(),
        }
    }

    /// Column derived from the status field, if it is one of the known labels
    pub fn column(&self) -> Option<ColumnId> {
        ColumnId::from_wire(&self.status)
    }

    /// Set a free-form field
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Read a free-form field as text. Numbers are rendered, null is absent.
    pub fn field_text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}
