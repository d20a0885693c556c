//! Board model: three ordered columns of event cards and the pure functions
//! that reshape them.
//!
//! Every function here takes the current [`BoardState`] by reference and
//! returns a new one. Columns are reference counted, so a move only
//! reallocates the columns it touches; the untouched column is shared with
//! the previous state.

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::{RollbackPlacement, UnknownStatusPolicy};
use crate::error::{BoardError, Result};
use crate::types::{COLUMNS, ColumnId, DropTarget, Event, EventId};

/// An ordered column of cards, shared between board snapshots
pub type Column = Arc<Vec<Arc<Event>>>;

/// Mapping from each column to its ordered cards
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    columns: [Column; 3],
}

impl PartialEq for BoardState {
    fn eq(&self, other: &Self) -> bool {
        COLUMNS
            .iter()
            .all(|&c| self.column(c) == other.column(c))
    }
}

impl BoardState {
    /// Build a board from already-grouped columns
    pub fn from_columns(pending: Vec<Event>, in_progress: Vec<Event>, completed: Vec<Event>) -> Self {
        let wrap = |events: Vec<Event>| -> Column { Arc::new(events.into_iter().map(Arc::new).collect()) };
        Self {
            columns: [wrap(pending), wrap(in_progress), wrap(completed)],
        }
    }

    /// Cards of a column in on-screen order
    pub fn column(&self, column: ColumnId) -> &[Arc<Event>] {
        &self.columns[column.index()]
    }

    /// Ids of a column's cards in on-screen order
    pub fn column_ids(&self, column: ColumnId) -> Vec<&EventId> {
        self.column(column).iter().map(|e| &e.id).collect()
    }

    /// Total number of cards on the board
    pub fn len(&self) -> usize {
        self.columns.iter().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &EventId) -> bool {
        self.position_of(id).is_some()
    }

    /// Column and index currently holding the event
    pub fn position_of(&self, id: &EventId) -> Option<(ColumnId, usize)> {
        COLUMNS.iter().find_map(|&column| {
            self.column(column)
                .iter()
                .position(|e| &e.id == id)
                .map(|idx| (column, idx))
        })
    }

    /// Look up an event anywhere on the board
    pub fn event(&self, id: &EventId) -> Option<&Arc<Event>> {
        self.position_of(id)
            .map(|(column, idx)| &self.column(column)[idx])
    }

    /// Iterate every card with the column that holds it
    pub fn iter(&self) -> impl Iterator<Item = (ColumnId, &Arc<Event>)> {
        COLUMNS
            .iter()
            .flat_map(move |&c| self.column(c).iter().map(move |e| (c, e)))
    }

    /// Whether the column storage is physically shared with another snapshot
    pub fn shares_column(&self, other: &BoardState, column: ColumnId) -> bool {
        Arc::ptr_eq(&self.columns[column.index()], &other.columns[column.index()])
    }

    /// True when every event id appears in exactly one column, once
    pub fn is_partitioned(&self) -> bool {
        let mut seen = HashSet::new();
        self.iter().all(|(_, e)| seen.insert(e.id.clone()))
    }

    fn with_column(&self, column: ColumnId, cards: Vec<Arc<Event>>) -> Self {
        let mut next = self.clone();
        next.columns[column.index()] = Arc::new(cards);
        next
    }
}

/// Result of partitioning a fetched event list
#[derive(Debug, Clone)]
pub struct GroupedEvents {
    pub state: BoardState,
    /// Events left off the board because their status matched no column
    pub excluded: Vec<EventId>,
}

/// Partition a fetched event list into columns by status.
///
/// Server order is kept within each column. Events whose status is not one
/// of the three wire labels are handled according to `policy`.
pub fn group_events(events: Vec<Event>, policy: UnknownStatusPolicy) -> Result<GroupedEvents> {
    let mut columns: [Vec<Event>; 3] = Default::default();
    let mut excluded = Vec::new();

    for event in events {
        match (event.column(), policy) {
            (Some(column), _) => columns[column.index()].push(event),
            (None, UnknownStatusPolicy::Exclude) => {
                tracing::warn!(
                    "Excluding event '{}' with unknown status '{}'",
                    event.id,
                    event.status
                );
                excluded.push(event.id);
            }
            (None, UnknownStatusPolicy::Reject) => {
                return Err(BoardError::LoadFailure(format!(
                    "event '{}' has unknown status '{}'",
                    event.id, event.status
                )));
            }
            (None, UnknownStatusPolicy::Fallback(column)) => {
                tracing::debug!(
                    "Placing event '{}' with unknown status '{}' in {}",
                    event.id,
                    event.status,
                    column.display_name()
                );
                columns[column.index()].push(event);
            }
        }
    }

    let [pending, in_progress, completed] = columns;
    Ok(GroupedEvents {
        state: BoardState::from_columns(pending, in_progress, completed),
        excluded,
    })
}

/// Resolve the column a drop target refers to.
///
/// Column targets resolve to themselves even when the column is empty;
/// event targets resolve to the column currently holding that event.
pub fn locate_column(state: &BoardState, target: &DropTarget) -> Option<ColumnId> {
    match target {
        DropTarget::Column(column) => Some(*column),
        DropTarget::Event(id) => state.position_of(id).map(|(column, _)| column),
    }
}

/// A card that changed column, with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnChange {
    pub event_id: EventId,
    pub from: ColumnId,
    pub from_index: usize,
    pub to: ColumnId,
}

/// Result of applying a completed drag gesture
#[derive(Debug, Clone)]
pub struct MoveResult {
    pub state: BoardState,
    /// Whether the board changed at all
    pub moved: bool,
    /// Set when the card crossed a column boundary and its status must be committed
    pub change: Option<ColumnChange>,
}

impl MoveResult {
    fn unchanged(state: &BoardState) -> Self {
        Self {
            state: state.clone(),
            moved: false,
            change: None,
        }
    }
}

/// Compute the board after dropping `active` onto `over`.
///
/// - Unknown active card or target: no-op.
/// - Same column: the card is placed immediately before the target card, or
///   at the end when the target is the column itself or the card itself.
/// - Different column: the card is appended to the target column and its
///   status is rewritten to the target column's label.
pub fn apply_move(state: &BoardState, active: &EventId, over: &DropTarget) -> MoveResult {
    let Some((source, from_index)) = state.position_of(active) else {
        return MoveResult::unchanged(state);
    };
    let Some(target) = locate_column(state, over) else {
        return MoveResult::unchanged(state);
    };

    let mut source_cards: Vec<Arc<Event>> = state.column(source).to_vec();
    let card = source_cards.remove(from_index);

    if source == target {
        let insert_at = match over {
            DropTarget::Event(over_id) => source_cards.iter().position(|e| &e.id == over_id),
            DropTarget::Column(_) => None,
        };
        match insert_at {
            Some(idx) => source_cards.insert(idx, card),
            None => source_cards.push(card),
        }

        let moved = source_cards
            .iter()
            .zip(state.column(source).iter())
            .any(|(a, b)| a.id != b.id);
        if !moved {
            return MoveResult::unchanged(state);
        }

        return MoveResult {
            state: state.with_column(source, source_cards),
            moved: true,
            change: None,
        };
    }

    let mut target_cards: Vec<Arc<Event>> = state.column(target).to_vec();
    target_cards.push(with_status(card, target));

    MoveResult {
        state: state
            .with_column(source, source_cards)
            .with_column(target, target_cards),
        moved: true,
        change: Some(ColumnChange {
            event_id: active.clone(),
            from: source,
            from_index,
            to: target,
        }),
    }
}

/// Undo a cross-column move whose status commit failed.
///
/// Only the specific card is touched, and only if it still sits in the
/// move's target column. Returns the new board and whether it changed.
pub fn rollback_move(
    state: &BoardState,
    change: &ColumnChange,
    placement: RollbackPlacement,
) -> (BoardState, bool) {
    let Some((current, idx)) = state.position_of(&change.event_id) else {
        return (state.clone(), false);
    };
    if current != change.to || change.from == change.to {
        return (state.clone(), false);
    }

    let mut target_cards: Vec<Arc<Event>> = state.column(current).to_vec();
    let card = with_status(target_cards.remove(idx), change.from);

    let mut origin_cards: Vec<Arc<Event>> = state.column(change.from).to_vec();
    match placement {
        RollbackPlacement::OriginalIndex => {
            let at = change.from_index.min(origin_cards.len());
            origin_cards.insert(at, card);
        }
        RollbackPlacement::Append => origin_cards.push(card),
    }

    let next = state
        .with_column(current, target_cards)
        .with_column(change.from, origin_cards);
    (next, true)
}

/// Remove an event from whichever column holds it. No-op if absent.
pub fn remove_event(state: &BoardState, id: &EventId) -> BoardState {
    let Some((column, idx)) = state.position_of(id) else {
        return state.clone();
    };
    let mut cards = state.column(column).to_vec();
    cards.remove(idx);
    state.with_column(column, cards)
}

/// Append a new event to the column matching its status.
///
/// Events with an unknown status or an id already on the board are ignored.
pub fn append_event(state: &BoardState, event: Event) -> BoardState {
    let Some(column) = event.column() else {
        return state.clone();
    };
    if state.contains(&event.id) {
        return state.clone();
    }
    let mut cards = state.column(column).to_vec();
    cards.push(Arc::new(event));
    state.with_column(column, cards)
}

/// Swap in a fresh copy of an event that is already on the board.
///
/// The card keeps its position when its column is unchanged. A status edit
/// moves it to the end of its new column, and a status outside the known
/// columns takes it off the board. Events not on the board are ignored.
pub fn replace_event(state: &BoardState, event: Event) -> BoardState {
    let Some((column, idx)) = state.position_of(&event.id) else {
        return state.clone();
    };
    if event.column() == Some(column) {
        let mut cards = state.column(column).to_vec();
        cards[idx] = Arc::new(event);
        return state.with_column(column, cards);
    }
    append_event(&remove_event(state, &event.id), event)
}

fn with_status(card: Arc<Event>, column: ColumnId) -> Arc<Event> {
    if card.status == column.wire_label() {
        return card;
    }
    let mut card = card;
    Arc::make_mut(&mut card).status = column.wire_label().to_string();
    card
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(id: &str, column: ColumnId) -> Event {
        Event::new(id, format!("Event {id}"), column)
    }

    fn board(pending: &[&str], in_progress: &[&str], completed: &[&str]) -> BoardState {
        let make = |ids: &[&str], c| ids.iter().map(|id| ev(id, c)).collect();
        BoardState::from_columns(
            make(pending, ColumnId::Pending),
            make(in_progress, ColumnId::InProgress),
            make(completed, ColumnId::Completed),
        )
    }

    fn ids(state: &BoardState, column: ColumnId) -> Vec<&str> {
        state.column(column).iter().map(|e| e.id.as_str()).collect()
    }

    fn id(s: &str) -> EventId {
        EventId::new(s)
    }

    // ========================================================================
    // Grouping
    // ========================================================================

    #[test]
    fn test_group_events_by_status() {
        let events = vec![
            ev("1", ColumnId::Completed),
            ev("2", ColumnId::Pending),
            ev("3", ColumnId::InProgress),
            ev("4", ColumnId::Pending),
        ];
        let grouped = group_events(events, UnknownStatusPolicy::Exclude).unwrap();

        assert_eq!(ids(&grouped.state, ColumnId::Pending), vec!["2", "4"]);
        assert_eq!(ids(&grouped.state, ColumnId::InProgress), vec!["3"]);
        assert_eq!(ids(&grouped.state, ColumnId::Completed), vec!["1"]);
        assert!(grouped.excluded.is_empty());
    }

    #[test]
    fn test_group_events_excludes_unknown_status() {
        let mut odd = ev("9", ColumnId::Pending);
        odd.status = "Cancelado".to_string();
        let grouped =
            group_events(vec![ev("1", ColumnId::Pending), odd], UnknownStatusPolicy::Exclude)
                .unwrap();

        assert_eq!(grouped.state.len(), 1);
        assert_eq!(grouped.excluded, vec![id("9")]);
    }

    #[test]
    fn test_group_events_reject_policy_fails() {
        let mut odd = ev("9", ColumnId::Pending);
        odd.status = String::new();
        let err = group_events(vec![odd], UnknownStatusPolicy::Reject).unwrap_err();
        assert!(matches!(err, BoardError::LoadFailure(_)));
    }

    #[test]
    fn test_group_events_fallback_policy_appends() {
        let mut odd = ev("9", ColumnId::Pending);
        odd.status = "Arquivado".to_string();
        let grouped = group_events(
            vec![odd, ev("1", ColumnId::Completed)],
            UnknownStatusPolicy::Fallback(ColumnId::Completed),
        )
        .unwrap();

        assert_eq!(ids(&grouped.state, ColumnId::Completed), vec!["9", "1"]);
        assert!(grouped.excluded.is_empty());
    }

    // ========================================================================
    // locate_column
    // ========================================================================

    #[test]
    fn test_locate_column_prefers_column_ids() {
        let state = board(&[], &["a"], &[]);
        assert_eq!(
            locate_column(&state, &DropTarget::Column(ColumnId::Pending)),
            Some(ColumnId::Pending)
        );
        assert_eq!(
            locate_column(&state, &DropTarget::Event(id("a"))),
            Some(ColumnId::InProgress)
        );
        assert_eq!(locate_column(&state, &DropTarget::Event(id("zz"))), None);
    }

    #[test]
    fn test_locate_column_raw_label_resolves_to_column() {
        let state = board(&[], &[], &[]);
        let target = DropTarget::parse("Concluído");
        assert_eq!(locate_column(&state, &target), Some(ColumnId::Completed));
    }

    // ========================================================================
    // apply_move
    // ========================================================================

    #[test]
    fn test_reorder_in_place_before_target() {
        let state = board(&["B", "A", "C"], &[], &[]);
        let result = apply_move(&state, &id("A"), &DropTarget::Event(id("B")));

        assert!(result.moved);
        assert!(result.change.is_none());
        assert_eq!(ids(&result.state, ColumnId::Pending), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_reorder_already_in_place_is_unchanged() {
        let state = board(&["A", "B", "C"], &[], &[]);
        let result = apply_move(&state, &id("A"), &DropTarget::Event(id("B")));

        assert!(!result.moved);
        assert_eq!(result.state, state);
    }

    #[test]
    fn test_reorder_downwards_lands_before_target() {
        let state = board(&["A", "B", "C", "D"], &[], &[]);
        let result = apply_move(&state, &id("A"), &DropTarget::Event(id("D")));
        assert_eq!(ids(&result.state, ColumnId::Pending), vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn test_drop_on_own_column_appends() {
        let state = board(&["A", "B", "C"], &[], &[]);
        let result = apply_move(&state, &id("A"), &DropTarget::Column(ColumnId::Pending));
        assert_eq!(ids(&result.state, ColumnId::Pending), vec!["B", "C", "A"]);
        assert!(result.change.is_none());
    }

    #[test]
    fn test_drop_on_itself_appends() {
        let state = board(&["A", "B"], &[], &[]);
        let result = apply_move(&state, &id("A"), &DropTarget::Event(id("A")));
        assert!(result.moved);
        assert!(result.change.is_none());
        assert_eq!(ids(&result.state, ColumnId::Pending), vec!["B", "A"]);
    }

    #[test]
    fn test_drop_last_card_on_itself_is_unchanged() {
        let state = board(&["A", "B"], &[], &[]);
        let result = apply_move(&state, &id("B"), &DropTarget::Event(id("B")));
        assert!(!result.moved);
        assert_eq!(ids(&result.state, ColumnId::Pending), vec!["A", "B"]);
    }

    #[test]
    fn test_cross_column_appends_regardless_of_hover() {
        let state = board(&["X", "Y"], &["Z", "W"], &[]);
        let result = apply_move(&state, &id("X"), &DropTarget::Event(id("Z")));

        assert_eq!(ids(&result.state, ColumnId::Pending), vec!["Y"]);
        assert_eq!(ids(&result.state, ColumnId::InProgress), vec!["Z", "W", "X"]);
        assert_eq!(
            result.change,
            Some(ColumnChange {
                event_id: id("X"),
                from: ColumnId::Pending,
                from_index: 0,
                to: ColumnId::InProgress,
            })
        );
    }

    #[test]
    fn test_cross_column_rewrites_status() {
        let state = board(&["X"], &[], &[]);
        let result = apply_move(&state, &id("X"), &DropTarget::Column(ColumnId::Completed));
        let moved = result.state.event(&id("X")).unwrap();
        assert_eq!(moved.status, "Concluído");
        assert_eq!(state.event(&id("X")).unwrap().status, "Aguardando");
    }

    #[test]
    fn test_cross_column_into_empty_column() {
        let state = board(&["X"], &[], &[]);
        let result = apply_move(&state, &id("X"), &DropTarget::parse("Em Andamento"));
        assert_eq!(ids(&result.state, ColumnId::InProgress), vec!["X"]);
        assert!(ids(&result.state, ColumnId::Pending).is_empty());
    }

    #[test]
    fn test_move_shares_untouched_column() {
        let state = board(&["X"], &["Y"], &["Z"]);
        let result = apply_move(&state, &id("X"), &DropTarget::Column(ColumnId::InProgress));
        assert!(result.state.shares_column(&state, ColumnId::Completed));
        assert!(!result.state.shares_column(&state, ColumnId::Pending));
    }

    #[test]
    fn test_stale_target_is_noop() {
        let state = board(&["A"], &["B"], &[]);
        let result = apply_move(&state, &id("A"), &DropTarget::Event(id("gone")));
        assert!(!result.moved);
        assert!(result.change.is_none());
        assert_eq!(result.state, state);
    }

    #[test]
    fn test_unknown_active_is_noop() {
        let state = board(&["A"], &[], &[]);
        let result = apply_move(&state, &id("gone"), &DropTarget::Column(ColumnId::Completed));
        assert!(!result.moved);
        assert_eq!(result.state, state);
    }

    // ========================================================================
    // replace_event
    // ========================================================================

    #[test]
    fn test_replace_event_keeps_position() {
        let state = board(&["A", "B", "C"], &[], &[]);
        let edited = ev("B", ColumnId::Pending).with_field("location", "Hall 2");
        let next = replace_event(&state, edited);

        assert_eq!(ids(&next, ColumnId::Pending), vec!["A", "B", "C"]);
        assert_eq!(
            next.event(&id("B")).unwrap().field_text("location").as_deref(),
            Some("Hall 2")
        );
        assert!(next.shares_column(&state, ColumnId::Completed));
    }

    #[test]
    fn test_replace_event_with_new_status_moves_card() {
        let state = board(&["A", "B"], &["Z"], &[]);
        let next = replace_event(&state, ev("A", ColumnId::InProgress));

        assert_eq!(ids(&next, ColumnId::Pending), vec!["B"]);
        assert_eq!(ids(&next, ColumnId::InProgress), vec!["Z", "A"]);
        assert!(next.is_partitioned());
    }

    #[test]
    fn test_replace_unknown_event_is_noop() {
        let state = board(&["A"], &[], &[]);
        let next = replace_event(&state, ev("Q", ColumnId::Pending));
        assert_eq!(next, state);
    }

    // ========================================================================
    // rollback_move
    // ========================================================================

    #[test]
    fn test_rollback_restores_pre_move_state() {
        let state = board(&["X", "Y"], &["Z"], &[]);
        let moved = apply_move(&state, &id("X"), &DropTarget::Column(ColumnId::Completed));
        let change = moved.change.clone().unwrap();

        let (restored, changed) =
            rollback_move(&moved.state, &change, RollbackPlacement::OriginalIndex);
        assert!(changed);
        assert_eq!(restored, state);
    }

    #[test]
    fn test_rollback_append_placement() {
        let state = board(&["X", "Y"], &[], &[]);
        let moved = apply_move(&state, &id("X"), &DropTarget::Column(ColumnId::Completed));
        let change = moved.change.unwrap();

        let (restored, _) = rollback_move(&moved.state, &change, RollbackPlacement::Append);
        assert_eq!(ids(&restored, ColumnId::Pending), vec!["Y", "X"]);
        assert_eq!(restored.event(&id("X")).unwrap().status, "Aguardando");
    }

    #[test]
    fn test_rollback_clamps_index_after_column_shrank() {
        let state = board(&["A", "B", "X"], &[], &[]);
        let moved = apply_move(&state, &id("X"), &DropTarget::Column(ColumnId::InProgress));
        let change = moved.change.unwrap();
        let shrunk = remove_event(&remove_event(&moved.state, &id("A")), &id("B"));

        let (restored, changed) =
            rollback_move(&shrunk, &change, RollbackPlacement::OriginalIndex);
        assert!(changed);
        assert_eq!(ids(&restored, ColumnId::Pending), vec!["X"]);
    }

    #[test]
    fn test_rollback_keeps_later_unrelated_moves() {
        let state = board(&["X", "Y"], &["Z"], &[]);
        let first = apply_move(&state, &id("X"), &DropTarget::Column(ColumnId::Completed));
        let change = first.change.clone().unwrap();
        let second = apply_move(&first.state, &id("Z"), &DropTarget::Column(ColumnId::Pending));

        let (restored, _) =
            rollback_move(&second.state, &change, RollbackPlacement::OriginalIndex);
        assert_eq!(ids(&restored, ColumnId::Pending), vec!["X", "Y", "Z"]);
        assert!(ids(&restored, ColumnId::InProgress).is_empty());
        assert!(ids(&restored, ColumnId::Completed).is_empty());
    }

    #[test]
    fn test_rollback_skips_card_that_moved_on() {
        let state = board(&["X"], &[], &[]);
        let first = apply_move(&state, &id("X"), &DropTarget::Column(ColumnId::InProgress));
        let change = first.change.clone().unwrap();
        let second = apply_move(&first.state, &id("X"), &DropTarget::Column(ColumnId::Completed));

        let (after, changed) =
            rollback_move(&second.state, &change, RollbackPlacement::OriginalIndex);
        assert!(!changed);
        assert_eq!(after, second.state);
    }

    #[test]
    fn test_rollback_of_removed_card_is_noop() {
        let state = board(&["X"], &[], &[]);
        let moved = apply_move(&state, &id("X"), &DropTarget::Column(ColumnId::Completed));
        let change = moved.change.unwrap();
        let removed = remove_event(&moved.state, &id("X"));

        let (after, changed) = rollback_move(&removed, &change, RollbackPlacement::Append);
        assert!(!changed);
        assert!(after.is_empty());
    }

    // ========================================================================
    // remove / append
    // ========================================================================

    #[test]
    fn test_remove_event_is_idempotent() {
        let state = board(&["A", "B"], &["C"], &[]);
        let once = remove_event(&state, &id("B"));
        let twice = remove_event(&once, &id("B"));

        assert_eq!(ids(&once, ColumnId::Pending), vec!["A"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_append_event_uses_status_column() {
        let state = board(&["A"], &[], &[]);
        let next = append_event(&state, ev("N", ColumnId::InProgress));
        assert_eq!(ids(&next, ColumnId::InProgress), vec!["N"]);

        let duplicate = append_event(&next, ev("N", ColumnId::Pending));
        assert_eq!(duplicate, next);
    }

    #[test]
    fn test_partition_holds_across_moves() {
        let mut state = board(&["A", "B"], &["C"], &["D"]);
        let moves = [
            ("A", DropTarget::Column(ColumnId::Completed)),
            ("C", DropTarget::Event(id("B"))),
            ("D", DropTarget::Event(id("A"))),
            ("B", DropTarget::Column(ColumnId::InProgress)),
            ("missing", DropTarget::Column(ColumnId::Pending)),
        ];
        for (active, over) in moves {
            state = apply_move(&state, &id(active), &over).state;
            assert!(state.is_partitioned());
            assert_eq!(state.len(), 4);
        }
    }
}
