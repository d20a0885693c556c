//! Kanban board for events (`eventboard board`)
//!
//! Events are grouped into three status columns. Cards are moved
//! optimistically and the new status is committed to the event store
//! afterwards; a failed commit puts the card back and raises a notification.

pub mod commit_queue;
pub mod engine;
pub mod model;
pub mod notification;
pub mod search;
pub mod session;

pub use commit_queue::CommitQueue;
pub use engine::{BoardEngine, CommitOutcome};
pub use model::{
    BoardState, apply_move, group_events, locate_column, remove_event, replace_event,
};
pub use notification::{Notification, NotificationLevel};
pub use search::{BoardView, filter_board};
pub use session::{BoardAction, DragSession, Effect, PendingMove, reduce_board_state};
