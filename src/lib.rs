pub mod board;
pub mod checklist;
pub mod cli;
pub mod commands;
pub mod comments;
pub mod config;
pub mod error;
pub mod remote;
pub mod types;

pub use board::{
    BoardAction, BoardEngine, BoardState, BoardView, CommitQueue, DragSession, Notification,
    PendingMove, filter_board,
};
pub use config::{Config, RollbackPlacement, UnknownStatusPolicy};
pub use error::{BoardError, Result};
pub use remote::{CollaborationStore, EventFilters, EventStore, HttpEventStore};
pub use types::{ColumnId, DropTarget, Event, EventId, RecordId};
