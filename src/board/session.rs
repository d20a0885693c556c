//! Drag session state machine and the board reducer.
//!
//! All board mutations go through [`reduce_board_state`], a pure function from
//! the current [`EngineState`] and a [`BoardAction`] to the next state plus an
//! optional side effect for the async layer to perform. Commit outcomes come
//! back in as further actions.

use crate::board::model::{self, BoardState, ColumnChange};
use crate::board::notification::Notification;
use crate::config::RollbackPlacement;
use crate::types::{ColumnId, DropTarget, Event, EventId};

/// Transient record of an in-progress drag gesture
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragSession {
    #[default]
    Idle,
    Dragging {
        active_id: EventId,
        /// Current candidate drop target while hovering
        over: Option<DropTarget>,
    },
}

impl DragSession {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragSession::Dragging { .. })
    }

    pub fn active_id(&self) -> Option<&EventId> {
        match self {
            DragSession::Dragging { active_id, .. } => Some(active_id),
            DragSession::Idle => None,
        }
    }
}

/// An optimistic cross-column move whose status commit has not resolved yet.
///
/// Carries the pre-move column and index so a failed commit can be undone
/// without recomputing anything from the current board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub seq: u64,
    pub event_id: EventId,
    pub from: ColumnId,
    pub from_index: usize,
    pub to: ColumnId,
}

impl PendingMove {
    /// Status string to send to the remote store
    pub fn status_label(&self) -> &'static str {
        self.to.wire_label()
    }

    fn as_change(&self) -> ColumnChange {
        ColumnChange {
            event_id: self.event_id.clone(),
            from: self.from,
            from_index: self.from_index,
            to: self.to,
        }
    }
}

/// Live engine state: the board plus everything needed to reconcile it
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    pub board: BoardState,
    pub drag: DragSession,
    /// In-flight status commits, oldest first
    pub in_flight: Vec<PendingMove>,
    /// Notifications not yet taken by the caller
    pub notifications: Vec<Notification>,
    pub next_seq: u64,
}

/// Actions that can modify the engine state
#[derive(Debug, Clone)]
pub enum BoardAction {
    /// Replace the board with a freshly loaded one
    Loaded(BoardState),
    DragStart(EventId),
    DragOver(Option<DropTarget>),
    /// Release the drag; falls back to the last hovered target when `None`
    DragEnd(Option<DropTarget>),
    DragCancel,
    /// Move a card without a drag gesture
    Move { active: EventId, over: DropTarget },
    CommitSucceeded { seq: u64 },
    CommitFailed { seq: u64, reason: String },
    /// Drop a card from the board (after a remote delete)
    Remove(EventId),
    /// Add a card created remotely
    Insert(Event),
    /// Refresh a card after a remote field edit
    Replace(Event),
}

/// Side effect requested by the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Persist the moved card's new status
    CommitStatus(PendingMove),
}

/// Pure reducer for engine state transitions
pub fn reduce_board_state(
    mut state: EngineState,
    action: BoardAction,
    placement: RollbackPlacement,
) -> (EngineState, Option<Effect>) {
    match action {
        BoardAction::Loaded(board) => {
            state.board = board;
            state.drag = DragSession::Idle;
        }
        BoardAction::DragStart(id) => {
            if let Some(active) = state.drag.active_id() {
                tracing::debug!("Ignoring drag start of '{id}' while '{active}' is dragged");
            } else {
                state.drag = DragSession::Dragging {
                    active_id: id,
                    over: None,
                };
            }
        }
        BoardAction::DragOver(target) => {
            if let DragSession::Dragging { over, .. } = &mut state.drag {
                *over = target;
            }
        }
        BoardAction::DragEnd(target) => {
            let DragSession::Dragging { active_id, over } = std::mem::take(&mut state.drag) else {
                return (state, None);
            };
            let Some(target) = target.or(over) else {
                return (state, None);
            };
            return apply_move(state, active_id, target);
        }
        BoardAction::DragCancel => {
            state.drag = DragSession::Idle;
        }
        BoardAction::Move { active, over } => {
            return apply_move(state, active, over);
        }
        BoardAction::CommitSucceeded { seq } => {
            if let Some(pos) = state.in_flight.iter().position(|m| m.seq == seq) {
                let done = state.in_flight.remove(pos);
                tracing::debug!("Committed status '{}' for '{}'", done.status_label(), done.event_id);
            }
        }
        BoardAction::CommitFailed { seq, reason } => {
            let Some(pos) = state.in_flight.iter().position(|m| m.seq == seq) else {
                tracing::debug!("Ignoring outcome of unknown commit {seq}");
                return (state, None);
            };
            let failed = state.in_flight.remove(pos);
            roll_back(&mut state, &failed, placement);
            state
                .notifications
                .push(Notification::move_failed(&failed.event_id, &reason));
        }
        BoardAction::Remove(id) => {
            state.board = model::remove_event(&state.board, &id);
        }
        BoardAction::Insert(event) => {
            state.board = model::append_event(&state.board, event);
        }
        BoardAction::Replace(event) => {
            state.board = model::replace_event(&state.board, event);
        }
    }
    (state, None)
}

fn apply_move(
    mut state: EngineState,
    active: EventId,
    over: DropTarget,
) -> (EngineState, Option<Effect>) {
    let result = model::apply_move(&state.board, &active, &over);
    state.board = result.state;

    let Some(change) = result.change else {
        if !result.moved {
            tracing::debug!("Drop of '{active}' on {over} left the board unchanged");
        }
        return (state, None);
    };

    let pending = PendingMove {
        seq: state.next_seq,
        event_id: change.event_id,
        from: change.from,
        from_index: change.from_index,
        to: change.to,
    };
    state.next_seq += 1;
    tracing::info!(
        "Moved '{}' from {} to {}",
        pending.event_id,
        pending.from.display_name(),
        pending.to.display_name()
    );
    state.in_flight.push(pending.clone());
    (state, Some(Effect::CommitStatus(pending)))
}

/// Undo a failed move, or hand its origin to a newer move of the same card.
fn roll_back(state: &mut EngineState, failed: &PendingMove, placement: RollbackPlacement) {
    if let Some(newer) = state
        .in_flight
        .iter_mut()
        .find(|m| m.event_id == failed.event_id && m.seq > failed.seq)
    {
        tracing::warn!(
            "Commit {} for '{}' failed; newer move {} now returns to {}",
            failed.seq,
            failed.event_id,
            newer.seq,
            failed.from.display_name()
        );
        newer.from = failed.from;
        newer.from_index = failed.from_index;
        return;
    }

    let (board, changed) = model::rollback_move(&state.board, &failed.as_change(), placement);
    if changed {
        tracing::warn!(
            "Rolled back '{}' to {}",
            failed.event_id,
            failed.from.display_name()
        );
        state.board = board;
    } else {
        tracing::warn!(
            "Commit for '{}' failed but the card is no longer in {}",
            failed.event_id,
            failed.to.display_name()
        );
    }
}
