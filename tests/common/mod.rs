#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use eventboard::error::{BoardError, Result};
use eventboard::remote::{
    ChecklistItem, ChecklistUpdate, CollaborationStore, Comment, EventFilters, EventStore,
    NewChecklistItem, NewComment, NewEvent, User,
};
use eventboard::types::{ColumnId, Event, EventId, RecordId};
use serde_json::{Map, Value};

/// In-memory event store with scriptable failures
#[derive(Default)]
pub struct FakeStore {
    events: Mutex<Vec<Event>>,
    checklist: Mutex<Vec<ChecklistItem>>,
    comments: Mutex<Vec<Comment>>,
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
    fail_list: AtomicBool,
    fail_delete: AtomicBool,
    panic_status: AtomicBool,
    failing_status: Mutex<HashSet<EventId>>,
    status_calls: Mutex<Vec<(EventId, ColumnId)>>,
    list_calls: Mutex<Vec<EventFilters>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1000),
            ..Default::default()
        }
    }

    pub fn with_events(events: Vec<Event>) -> Self {
        let store = Self::new();
        *store.events.lock().unwrap() = events;
        store
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        *self.users.lock().unwrap() = users;
        self
    }

    /// Make every status update for this event fail
    pub fn fail_status_for(&self, id: &str) {
        self.failing_status.lock().unwrap().insert(EventId::new(id));
    }

    pub fn fail_list(&self) {
        self.fail_list.store(true, Ordering::SeqCst);
    }

    /// Make status updates panic instead of returning
    pub fn panic_on_status(&self) {
        self.panic_status.store(true, Ordering::SeqCst);
    }

    pub fn fail_delete(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }

    pub fn status_calls(&self) -> Vec<(EventId, ColumnId)> {
        self.status_calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> Vec<EventFilters> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn stored_status(&self, id: &str) -> Option<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id.as_str() == id)
            .map(|e| e.status.clone())
    }

    pub fn checklist_texts(&self, event_id: &str) -> Vec<String> {
        self.checklist
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.event_id.as_str() == event_id)
            .map(|i| i.text.clone())
            .collect()
    }

    pub fn comment_count(&self) -> usize {
        self.comments.lock().unwrap().len()
    }

    fn next_id(&self) -> RecordId {
        RecordId::from(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl EventStore for FakeStore {
    async fn list_events(&self, filters: &EventFilters) -> Result<Vec<Event>> {
        self.list_calls.lock().unwrap().push(filters.clone());
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(BoardError::Api("/api/events returned 503".to_string()));
        }
        Ok(self.events.lock().unwrap().clone())
    }

    async fn get_event(&self, id: &EventId) -> Result<Event> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .find(|e| &e.id == id)
            .cloned()
            .ok_or_else(|| BoardError::EventNotFound(id.to_string()))
    }

    async fn create_event(&self, event: &NewEvent) -> Result<Event> {
        let created = Event {
            id: self.next_id(),
            title: event.title.clone(),
            status: event.status.wire_label().to_string(),
            fields: event.fields.clone(),
        };
        self.events.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_event(&self, id: &EventId, fields: &Map<String, Value>) -> Result<Event> {
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| BoardError::EventNotFound(id.to_string()))?;
        for (key, value) in fields {
            match (key.as_str(), value) {
                ("title", Value::String(title)) => event.title = title.clone(),
                ("status", Value::String(status)) => event.status = status.clone(),
                _ => {
                    event.fields.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(event.clone())
    }

    async fn update_event_status(&self, id: &EventId, status: ColumnId) -> Result<Event> {
        if self.panic_status.load(Ordering::SeqCst) {
            panic!("status update for '{id}' crashed");
        }
        self.status_calls.lock().unwrap().push((id.clone(), status));
        if self.failing_status.lock().unwrap().contains(id) {
            return Err(BoardError::Api(format!(
                "/api/events/{id}/status returned 500 Internal Server Error"
            )));
        }
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| BoardError::EventNotFound(id.to_string()))?;
        event.status = status.wire_label().to_string();
        Ok(event.clone())
    }

    async fn delete_event(&self, id: &EventId) -> Result<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(BoardError::Api(format!("/api/events/{id} returned 500")));
        }
        self.events.lock().unwrap().retain(|e| &e.id != id);
        Ok(())
    }
}

impl CollaborationStore for FakeStore {
    async fn list_checklist(&self, event_id: &EventId) -> Result<Vec<ChecklistItem>> {
        Ok(self
            .checklist
            .lock()
            .unwrap()
            .iter()
            .filter(|i| &i.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn create_checklist_item(&self, item: &NewChecklistItem) -> Result<ChecklistItem> {
        let created = ChecklistItem {
            id: self.next_id(),
            event_id: item.event_id.clone(),
            text: item.text.clone(),
            done: false,
            responsible_id: item.responsible_id.clone(),
            responsible_user: None,
            extra: Map::new(),
        };
        self.checklist.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_checklist_item(
        &self,
        id: &RecordId,
        update: &ChecklistUpdate,
    ) -> Result<ChecklistItem> {
        let mut items = self.checklist.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|i| &i.id == id)
            .ok_or_else(|| BoardError::Api(format!("/api/checklist/{id} returned 404")))?;
        if let Some(text) = &update.text {
            item.text = text.clone();
        }
        if let Some(done) = update.done {
            item.done = done;
        }
        if let Some(responsible) = &update.responsible_id {
            item.responsible_id = responsible.clone();
        }
        Ok(item.clone())
    }

    async fn delete_checklist_item(&self, id: &RecordId) -> Result<()> {
        self.checklist.lock().unwrap().retain(|i| &i.id != id);
        Ok(())
    }

    async fn list_comments(&self, event_id: &EventId) -> Result<Vec<Comment>> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| &c.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment> {
        let created = Comment {
            id: self.next_id(),
            event_id: comment.event_id.clone(),
            text: comment.text.clone(),
            author: None,
            extra: Map::new(),
        };
        self.comments.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_comment(&self, id: &RecordId, text: &str) -> Result<Comment> {
        let mut comments = self.comments.lock().unwrap();
        let comment = comments
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| BoardError::Api(format!("/api/comments/{id} returned 404")))?;
        comment.text = text.to_string();
        Ok(comment.clone())
    }

    async fn delete_comment(&self, id: &RecordId) -> Result<()> {
        self.comments.lock().unwrap().retain(|c| &c.id != id);
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.users.lock().unwrap().clone())
    }
}

/// Event with a column status
pub fn event(id: &str, title: &str, column: ColumnId) -> Event {
    Event::new(id, title, column)
}

/// Event with a raw, possibly unknown, status string
pub fn event_with_status(id: &str, title: &str, status: &str) -> Event {
    let mut event = Event::new(id, title, ColumnId::Pending);
    event.status = status.to_string();
    event
}

/// Pending [X, Y], InProgress [Z], Completed []
pub fn sample_events() -> Vec<Event> {
    vec![
        event("X", "Tech Conference", ColumnId::Pending),
        event("Z", "Rust Workshop", ColumnId::InProgress),
        event("Y", "Team Party", ColumnId::Pending),
    ]
}
