use std::time::Instant;

use crate::{Generation, ProbeOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The presentation layer changed the text field (raw, not debounced).
    TextEdited { text: String, at: Instant },
    /// Timer wake-up; releases the debounced edit once its quiet window elapsed.
    Tick { now: Instant },
    /// The engine put a probe on the wire.
    ProbeStarted { generation: Generation },
    /// The engine finished a probe. `None` means it was cancelled.
    ProbeFinished {
        generation: Generation,
        outcome: Option<ProbeOutcome>,
    },
    /// Test harness reset back to the start-up state.
    Reset,
    NoOp,
}
