use crate::state::{DisplayState, SessionState};

/// Notifications published by a monitor session to its subscribers.
///
/// Sources:
/// - Sampling job          → `Display`
/// - Session lifecycle     → `StateChanged`
/// - Adaptor resolution    → `Failed`
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// Fresh window and labels after a completed tick.
    Display(DisplayState),
    /// The session moved to a new lifecycle state.
    StateChanged(SessionState),
    /// Resolution failed; carries a human-readable reason. Published once.
    Failed(String),
}
