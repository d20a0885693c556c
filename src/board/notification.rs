//! Non-blocking notifications raised by the board engine.

use owo_colors::{OwoColorize, Style};
use serde::Serialize;

use crate::types::EventId;

/// A notification message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// The message to display
    pub message: String,
    /// The severity level of the notification
    pub level: NotificationLevel,
    /// Event the notification is about, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
}

/// Severity level for notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// Something on the board needs attention, e.g. a hidden event
    Warning,
    /// A remote operation failed
    Error,
}

impl Notification {
    fn new(message: String, level: NotificationLevel) -> Self {
        Self {
            message,
            level,
            event_id: None,
        }
    }

    /// Create a warning notification
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message.into(), NotificationLevel::Warning)
    }

    /// Create an error notification
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message.into(), NotificationLevel::Error)
    }

    /// Attach the event this notification refers to
    pub fn for_event(mut self, id: EventId) -> Self {
        self.event_id = Some(id);
        self
    }

    /// Notification for an event left off the board
    pub fn unknown_status(id: &EventId) -> Self {
        Self::warning(format!("Event '{id}' has an unknown status and is not shown"))
            .for_event(id.clone())
    }

    /// Notification for a status commit that failed and was rolled back
    pub fn move_failed(id: &EventId, reason: &str) -> Self {
        Self::error(format!("Could not move event '{id}': {reason}")).for_event(id.clone())
    }

    /// Terminal style for this notification's level
    pub fn style(&self) -> Style {
        match self.level {
            NotificationLevel::Warning => Style::new().yellow(),
            NotificationLevel::Error => Style::new().red(),
        }
    }

    /// Render the message for a terminal
    pub fn render(&self) -> String {
        format!("{}", self.message.style(self.style()))
    }
}
