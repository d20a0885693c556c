//! Board reconciliation engine.
//!
//! [`BoardEngine`] owns the live board and feeds every change through
//! [`reduce_board_state`]. Remote calls are made through an [`EventStore`];
//! status commits are handed out as futures so the caller decides whether to
//! await them inline or run them on a [`CommitQueue`](super::CommitQueue).

use std::future::Future;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::board::model::{self, BoardState, GroupedEvents};
use crate::board::notification::Notification;
use crate::board::session::{
    BoardAction, DragSession, Effect, EngineState, PendingMove, reduce_board_state,
};
use crate::config::{Config, RollbackPlacement, UnknownStatusPolicy};
use crate::error::{BoardError, Result};
use crate::remote::{EventFilters, EventStore, NewEvent};
use crate::types::{ColumnId, DropTarget, Event, EventId};

/// Outcome of one status commit, fed back into the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub seq: u64,
    pub event_id: EventId,
    /// Failure reason; `None` when the commit succeeded
    pub error: Option<String>,
}

impl CommitOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl From<CommitOutcome> for BoardAction {
    fn from(outcome: CommitOutcome) -> Self {
        match outcome.error {
            None => BoardAction::CommitSucceeded { seq: outcome.seq },
            Some(reason) => BoardAction::CommitFailed {
                seq: outcome.seq,
                reason,
            },
        }
    }
}

/// Owns the live board state and reconciles it with the event store
pub struct BoardEngine<S> {
    store: Arc<S>,
    state: EngineState,
    unknown_status: UnknownStatusPolicy,
    rollback_placement: RollbackPlacement,
    excluded: Vec<EventId>,
}

impl<S: EventStore + 'static> BoardEngine<S> {
    /// Create an engine with default policies and an empty board
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            state: EngineState::default(),
            unknown_status: UnknownStatusPolicy::default(),
            rollback_placement: RollbackPlacement::default(),
            excluded: Vec::new(),
        }
    }

    /// Create an engine using the policies from the configuration
    pub fn with_config(store: Arc<S>, config: &Config) -> Self {
        Self::new(store)
            .with_unknown_status(config.unknown_status)
            .with_rollback_placement(config.rollback_placement)
    }

    pub fn with_unknown_status(mut self, policy: UnknownStatusPolicy) -> Self {
        self.unknown_status = policy;
        self
    }

    pub fn with_rollback_placement(mut self, placement: RollbackPlacement) -> Self {
        self.rollback_placement = placement;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The live board
    pub fn board(&self) -> &BoardState {
        &self.state.board
    }

    pub fn drag_session(&self) -> &DragSession {
        &self.state.drag
    }

    /// Status commits that have not resolved yet, oldest first
    pub fn in_flight(&self) -> &[PendingMove] {
        &self.state.in_flight
    }

    /// Notifications raised since the last call to [`take_notifications`](Self::take_notifications)
    pub fn notifications(&self) -> &[Notification] {
        &self.state.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.state.notifications)
    }

    /// Events left off the board by the last load
    pub fn excluded(&self) -> &[EventId] {
        &self.excluded
    }

    /// Run an action through the reducer
    pub fn dispatch(&mut self, action: BoardAction) -> Option<Effect> {
        let state = std::mem::take(&mut self.state);
        let (state, effect) = reduce_board_state(state, action, self.rollback_placement);
        self.state = state;
        effect
    }

    /// Fetch every event and replace the board with the grouped result.
    ///
    /// On failure the current board is left untouched.
    pub async fn load_board(&mut self, filters: &EventFilters) -> Result<&BoardState> {
        let events = self.store.list_events(filters).await.map_err(|e| {
            tracing::error!("Failed to load events: {e}");
            match e {
                BoardError::LoadFailure(_) => e,
                other => BoardError::LoadFailure(other.to_string()),
            }
        })?;

        let count = events.len();
        let GroupedEvents { state, excluded } = model::group_events(events, self.unknown_status)?;
        tracing::info!(
            "Loaded {} events ({} excluded)",
            count,
            excluded.len()
        );

        self.dispatch(BoardAction::Loaded(state));
        self.state
            .notifications
            .extend(excluded.iter().map(Notification::unknown_status));
        self.excluded = excluded;
        Ok(&self.state.board)
    }

    /// Column a drop target refers to
    pub fn locate_column(&self, target: &DropTarget) -> Option<ColumnId> {
        model::locate_column(&self.state.board, target)
    }

    pub fn drag_start(&mut self, id: EventId) {
        self.dispatch(BoardAction::DragStart(id));
    }

    pub fn drag_over(&mut self, target: Option<DropTarget>) {
        self.dispatch(BoardAction::DragOver(target));
    }

    pub fn drag_cancel(&mut self) {
        self.dispatch(BoardAction::DragCancel);
    }

    /// Finish the drag, applying the move optimistically.
    ///
    /// Returns the pending commit when the card changed column.
    pub fn drag_end(&mut self, target: Option<DropTarget>) -> Option<PendingMove> {
        into_pending(self.dispatch(BoardAction::DragEnd(target)))
    }

    /// Apply a move without a drag gesture
    pub fn apply_move(&mut self, active: EventId, over: DropTarget) -> Option<PendingMove> {
        into_pending(self.dispatch(BoardAction::Move { active, over }))
    }

    /// Future that performs the remote status update for a pending move.
    ///
    /// It owns everything it needs, so it can be spawned.
    pub fn commit_request(
        &self,
        pending: &PendingMove,
    ) -> impl Future<Output = CommitOutcome> + Send + 'static + use<S> {
        let store = Arc::clone(&self.store);
        let seq = pending.seq;
        let event_id = pending.event_id.clone();
        let status = pending.to;

        async move {
            let error = match store.update_event_status(&event_id, status).await {
                Ok(_) => None,
                Err(e) => Some(e.to_string()),
            };
            CommitOutcome {
                seq,
                event_id,
                error,
            }
        }
    }

    /// Feed a commit outcome back into the board.
    ///
    /// A failure rolls the move back, raises one notification and is
    /// returned as [`BoardError::MoveCommitFailure`].
    pub fn resolve_commit(&mut self, outcome: CommitOutcome) -> Result<()> {
        let failure = outcome.error.clone().map(|reason| BoardError::MoveCommitFailure {
            event_id: outcome.event_id.clone(),
            reason,
        });
        self.dispatch(outcome.into());
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Persist the status of a pending move and reconcile the result
    pub async fn commit_status_change(&mut self, pending: &PendingMove) -> Result<()> {
        let outcome = self.commit_request(pending).await;
        self.resolve_commit(outcome)
    }

    /// Move a card and wait for its status commit, if one is needed
    pub async fn move_event(&mut self, active: EventId, over: DropTarget) -> Result<()> {
        match self.apply_move(active, over) {
            Some(pending) => self.commit_status_change(&pending).await,
            None => Ok(()),
        }
    }

    /// Create an event remotely and add it to the board
    pub async fn create_event(&mut self, event: &NewEvent) -> Result<Event> {
        let created = self.store.create_event(event).await?;
        tracing::info!("Created event '{}'", created.id);
        self.dispatch(BoardAction::Insert(created.clone()));
        Ok(created)
    }

    /// Edit fields of an event remotely and refresh its card.
    ///
    /// On failure the card is left as it was and an error notification is
    /// raised.
    pub async fn update_event(
        &mut self,
        id: &EventId,
        fields: &Map<String, Value>,
    ) -> Result<Event> {
        match self.store.update_event(id, fields).await {
            Ok(updated) => {
                tracing::info!("Updated {} field(s) of event '{id}'", fields.len());
                self.dispatch(BoardAction::Replace(updated.clone()));
                Ok(updated)
            }
            Err(e) => {
                tracing::warn!("Failed to update event '{id}': {e}");
                self.state.notifications.push(
                    Notification::error(format!("Could not update event '{id}': {e}"))
                        .for_event(id.clone()),
                );
                Err(e)
            }
        }
    }

    /// Delete an event remotely, then drop it from the board.
    ///
    /// If the remote delete fails the card stays where it is and an error
    /// notification is raised.
    pub async fn delete_event(&mut self, id: &EventId) -> Result<()> {
        if let Err(e) = self.store.delete_event(id).await {
            tracing::warn!("Failed to delete event '{id}': {e}");
            self.state.notifications.push(
                Notification::error(format!("Could not delete event '{id}': {e}"))
                    .for_event(id.clone()),
            );
            return Err(e);
        }
        tracing::info!("Deleted event '{id}'");
        self.remove_event(id);
        Ok(())
    }

    /// Drop an event from the board without touching the store
    pub fn remove_event(&mut self, id: &EventId) -> &BoardState {
        self.dispatch(BoardAction::Remove(id.clone()));
        &self.state.board
    }
}

fn into_pending(effect: Option<Effect>) -> Option<PendingMove> {
    match effect {
        Some(Effect::CommitStatus(pending)) => Some(pending),
        None => None,
    }
}
