//! Remote event store.
//!
//! The board talks to the event API through the [`EventStore`] trait so the
//! reconciliation engine can be driven by the HTTP client in production and
//! by an in-memory store in tests. Checklist, comment and user endpoints are
//! plain pass-through CRUD behind [`CollaborationStore`].

pub mod error;
pub mod http;

use std::collections::BTreeMap;
use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::types::{ColumnId, Event, EventId, RecordId};

pub use error::ApiError;
pub use http::HttpEventStore;

/// Query filters for listing events. Empty values are not sent.
pub type EventFilters = BTreeMap<String, String>;

/// Operations the board needs from the event store
pub trait EventStore: Send + Sync {
    /// Fetch every event matching the filters
    fn list_events(
        &self,
        filters: &EventFilters,
    ) -> impl Future<Output = Result<Vec<Event>>> + Send;

    /// Fetch a single event
    fn get_event(&self, id: &EventId) -> impl Future<Output = Result<Event>> + Send;

    /// Create an event and return it as stored
    fn create_event(&self, event: &NewEvent) -> impl Future<Output = Result<Event>> + Send;

    /// Overwrite the given fields of an event, leaving the others as they are
    fn update_event(
        &self,
        id: &EventId,
        fields: &Map<String, Value>,
    ) -> impl Future<Output = Result<Event>> + Send;

    /// Update only the status field of an event
    fn update_event_status(
        &self,
        id: &EventId,
        status: ColumnId,
    ) -> impl Future<Output = Result<Event>> + Send;

    /// Delete an event
    fn delete_event(&self, id: &EventId) -> impl Future<Output = Result<()>> + Send;
}

/// Body for creating an event. The server assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEvent {
    pub title: String,
    pub status: ColumnId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl NewEvent {
    pub fn new(title: impl Into<String>, status: ColumnId) -> Self {
        Self {
            title: title.into(),
            status,
            fields: Map::new(),
        }
    }

    /// Set a free-form field
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }
}

/// A checklist entry attached to an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: RecordId,
    pub event_id: EventId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_id: Option<RecordId>,
    /// Embedded user record, when the API joins it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_user: Option<User>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChecklistItem {
    /// Display name of the assigned user, if any
    pub fn responsible_name(&self) -> Option<&str> {
        self.responsible_user
            .as_ref()
            .map(|u| u.name.as_str())
            .or_else(|| self.extra.get("responsible").and_then(Value::as_str))
    }
}

/// Body for creating a checklist entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChecklistItem {
    pub event_id: EventId,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_id: Option<RecordId>,
}

/// Partial update of a checklist entry
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    /// `Some(None)` clears the assignment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_id: Option<Option<RecordId>>,
}

impl ChecklistUpdate {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.done.is_none() && self.responsible_id.is_none()
    }
}

/// A comment left on an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: RecordId,
    pub event_id: EventId,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for creating a comment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub event_id: EventId,
    pub text: String,
}

/// A team member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Checklist, comment and user endpoints
pub trait CollaborationStore: Send + Sync {
    fn list_checklist(
        &self,
        event_id: &EventId,
    ) -> impl Future<Output = Result<Vec<ChecklistItem>>> + Send;

    fn create_checklist_item(
        &self,
        item: &NewChecklistItem,
    ) -> impl Future<Output = Result<ChecklistItem>> + Send;

    fn update_checklist_item(
        &self,
        id: &RecordId,
        update: &ChecklistUpdate,
    ) -> impl Future<Output = Result<ChecklistItem>> + Send;

    fn delete_checklist_item(&self, id: &RecordId) -> impl Future<Output = Result<()>> + Send;

    fn list_comments(
        &self,
        event_id: &EventId,
    ) -> impl Future<Output = Result<Vec<Comment>>> + Send;

    fn create_comment(
        &self,
        comment: &NewComment,
    ) -> impl Future<Output = Result<Comment>> + Send;

    fn update_comment(
        &self,
        id: &RecordId,
        text: &str,
    ) -> impl Future<Output = Result<Comment>> + Send;

    fn delete_comment(&self, id: &RecordId) -> impl Future<Output = Result<()>> + Send;

    fn list_users(&self) -> impl Future<Output = Result<Vec<User>>> + Send;
}
