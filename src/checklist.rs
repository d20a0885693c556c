//! Event checklists and their starter templates.
//!
//! An event whose checklist comes back empty is seeded with the template for
//! its `type` field, so every card starts with a few concrete tasks.

use futures::future::try_join_all;

use crate::error::{BoardError, Result};
use crate::remote::{ChecklistItem, ChecklistUpdate, CollaborationStore, NewChecklistItem};
use crate::types::{Event, EventId, RecordId};

/// Event field that selects the checklist template
pub const EVENT_TYPE_FIELD: &str = "type";

const CONFERENCE_TEMPLATE: &[&str] = &[
    "Definir palestrantes",
    "Reservar auditório",
    "Preparar material promocional",
];

const WORKSHOP_TEMPLATE: &[&str] = &[
    "Confirmar instrutor",
    "Criar lista de participantes",
    "Organizar coffee break",
];

const PARTY_TEMPLATE: &[&str] = &["Definir playlist", "Contratar buffet", "Decorar o espaço"];

const DEFAULT_TEMPLATE: &[&str] = &["Definir orçamento", "Montar cronograma", "Confirmar local"];

/// Starter checklist for an event type
pub fn template_for(event_type: Option<&str>) -> &'static [&'static str] {
    match event_type {
        Some("Conferência") => CONFERENCE_TEMPLATE,
        Some("Workshop") => WORKSHOP_TEMPLATE,
        Some("Festa") => PARTY_TEMPLATE,
        _ => DEFAULT_TEMPLATE,
    }
}

/// Fetch an event's checklist, seeding it from its template when empty.
pub async fn load_checklist<S: CollaborationStore>(
    store: &S,
    event: &Event,
) -> Result<Vec<ChecklistItem>> {
    let items = store.list_checklist(&event.id).await?;
    if !items.is_empty() {
        return Ok(items);
    }

    let event_type = event.field_text(EVENT_TYPE_FIELD);
    let template = template_for(event_type.as_deref());
    tracing::info!(
        "Seeding checklist for '{}' with {} items",
        event.id,
        template.len()
    );

    let bodies: Vec<NewChecklistItem> = template
        .iter()
        .map(|text| NewChecklistItem {
            event_id: event.id.clone(),
            text: (*text).to_string(),
            responsible_id: None,
        })
        .collect();

    try_join_all(bodies.iter().map(|body| store.create_checklist_item(body))).await
}

/// Add an item to an event's checklist. Blank text is rejected locally.
pub async fn add_item<S: CollaborationStore>(
    store: &S,
    event_id: &EventId,
    text: &str,
    responsible_id: Option<RecordId>,
) -> Result<ChecklistItem> {
    let text = text.trim();
    if text.is_empty() {
        return Err(BoardError::InvalidInput(
            "checklist item text cannot be empty".to_string(),
        ));
    }

    store
        .create_checklist_item(&NewChecklistItem {
            event_id: event_id.clone(),
            text: text.to_string(),
            responsible_id,
        })
        .await
}

/// Flip an item between done and not done
pub async fn toggle_item<S: CollaborationStore>(
    store: &S,
    item: &ChecklistItem,
) -> Result<ChecklistItem> {
    let update = ChecklistUpdate {
        done: Some(!item.done),
        ..Default::default()
    };
    store.update_checklist_item(&item.id, &update).await
}

/// Assign an item to a user, or clear the assignment with `None`
pub async fn assign_item<S: CollaborationStore>(
    store: &S,
    item_id: &RecordId,
    responsible_id: Option<RecordId>,
) -> Result<ChecklistItem> {
    let update = ChecklistUpdate {
        responsible_id: Some(responsible_id),
        ..Default::default()
    };
    store.update_checklist_item(item_id, &update).await
}

/// Find an item in a fetched checklist
pub fn find_item<'a>(items: &'a [ChecklistItem], id: &RecordId) -> Result<&'a ChecklistItem> {
    items
        .iter()
        .find(|item| &item.id == id)
        .ok_or_else(|| BoardError::InvalidInput(format!("checklist item '{id}' not found")))
}

/// Count of done items and total items
pub fn progress(items: &[ChecklistItem]) -> (usize, usize) {
    (items.iter().filter(|i| i.done).count(), items.len())
}
