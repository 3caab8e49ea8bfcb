use std::time::{Duration, Instant};

/// Quiet interval used when none is configured.
pub const DEFAULT_QUIET: Duration = Duration::from_millis(500);

/// Time-injected debouncer for text edits.
///
/// The first value ever pushed is the field's initial content and is dropped.
/// Later values replace whatever is pending and restart the quiet window; the
/// pending value is released by [`Debouncer::poll`] once the window elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    quiet: Duration,
    seen_initial: bool,
    pending: Option<PendingEdit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingEdit {
    text: String,
    at: Instant,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET)
    }
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            seen_initial: false,
            pending: None,
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Records an edit. Returns `false` when the edit was the dropped initial value.
    pub fn push(&mut self, text: String, at: Instant) -> bool {
        if !self.seen_initial {
            self.seen_initial = true;
            return false;
        }
        self.pending = Some(PendingEdit { text, at });
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops the pending edit without releasing it.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// When the pending edit becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|edit| edit.at + self.quiet)
    }

    /// Releases the pending edit if its quiet window has elapsed by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = self.deadline().is_some_and(|deadline| now >= deadline);
        if due {
            self.pending.take().map(|edit| edit.text)
        } else {
            None
        }
    }
}
