//! Shared type definitions for application state.

/// Marker value to identify self-injected input events.
///
/// The keyboard hook compares `dwExtraInfo` against this and passes simulated
/// events straight through, so injected wheel events can never feed back into
/// combo evaluation.
pub const SIMULATED_EVENT_MARKER: usize = 0x4B57;

/// Which direction of the scroll combo an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComboSide {
    Up,
    Down,
}

impl ComboSide {
    pub fn label(self) -> &'static str {
        match self {
            ComboSide::Up => "scroll up",
            ComboSide::Down => "scroll down",
        }
    }
}

/// Notification event types for user feedback.
#[derive(Debug, Clone)]
pub enum NotificationEvent {
    Info(String),
    Warning(String),
    Error(String),
}
