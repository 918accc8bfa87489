//! Session interaction state.
//!
//! One [`InteractionState`] exists per session. It is created at boot with
//! every field at its default, mutated only by the engine's components (each
//! through its own slice), and dropped when the session ends.

use std::collections::HashMap;

/// Answer captured for one selectable wizard step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// The chosen option, if any.
    pub primary_value: Option<String>,
    /// Text typed for the sentinel option.
    pub free_text: String,
}

/// Everything the engine remembers about the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    /// Index into the narrative line list.
    pub sequence_position: usize,
    /// Latched once the narrative has finished.
    pub sequence_complete: bool,

    /// Decline activations on the current prompt instance.
    pub decline_count: u32,
    /// Latched once the accept control fires.
    pub accept_chosen: bool,
    /// Set when the decline control starts fleeing the pointer.
    pub evasive_mode_active: bool,

    /// Answers keyed by wizard step key.
    pub selections: HashMap<String, Selection>,
    /// Calendar-date literal from the date step.
    pub date_value: String,

    /// True while a remote submission is outstanding.
    pub submission_in_flight: bool,
    /// Seconds left on the review countdown.
    pub countdown_remaining: u32,
}

impl InteractionState {
    /// Fresh state for a new session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection for a step, creating an empty one on first access.
    pub fn selection_mut(&mut self, key: &str) -> &mut Selection {
        self.selections.entry(key.to_string()).or_default()
    }

    /// Selection for a step, if anything was recorded.
    pub fn selection(&self, key: &str) -> Option<&Selection> {
        self.selections.get(key)
    }
}
