use std::time::{Duration, Instant};

use url::Url;

use crate::debounce::Debouncer;
use crate::view_model::StatusSnapshot;
use crate::{CandidateUrl, RejectReason, ValidationOutcome};

/// Monotonic tag of one processed input; stale probe results carry an older one.
pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnreachableReason {
    /// The server answered with a status outside 200..400 and not 405.
    ServerError,
    /// No usable answer: connect failure, timeout, redirect loop and the like.
    TransportError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Carries the final URL after redirects.
    Reachable(Url),
    Unreachable(UnreachableReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProbeStatus {
    #[default]
    NotRequested,
    Pending,
    Finished(ProbeOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Debouncing,
    Probing,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PipelineState {
    url_string: String,
    validation: Option<ValidationOutcome>,
    probe: ProbeStatus,
    generation: Generation,
    last_processed: Option<String>,
    probes_in_flight: usize,
    debouncer: Debouncer,
    dirty: bool,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quiet_interval(quiet: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(quiet),
            ..Self::default()
        }
    }

    pub fn view(&self) -> StatusSnapshot {
        // Only a server that answered vouches for a URL.
        let reachable_url = match &self.probe {
            ProbeStatus::Finished(ProbeOutcome::Reachable(url)) => Some(url.clone()),
            _ => None,
        };

        StatusSnapshot {
            network_activity: self.probes_in_flight > 0,
            is_valid_url: self
                .validation
                .as_ref()
                .is_some_and(ValidationOutcome::is_accepted),
            is_reachable_url: reachable_url.is_some(),
            validated_url: reachable_url,
            phase: self.phase(),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.debouncer.is_pending() {
            Phase::Debouncing
        } else if self.probe == ProbeStatus::Pending {
            Phase::Probing
        } else {
            Phase::Idle
        }
    }

    pub fn url_string(&self) -> &str {
        &self.url_string
    }

    pub fn validation(&self) -> Option<&ValidationOutcome> {
        self.validation.as_ref()
    }

    pub fn probe(&self) -> &ProbeStatus {
        &self.probe
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn probes_in_flight(&self) -> usize {
        self.probes_in_flight
    }

    /// When the coordinator must wake up to release a debounced edit.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn quiet_interval(&self) -> Duration {
        self.debouncer.quiet()
    }

    /// Returns whether anything visible changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn record_edit(&mut self, text: String, at: Instant) {
        self.url_string.clone_from(&text);
        if self.debouncer.push(text, at) {
            self.dirty = true;
        }
    }

    pub(crate) fn poll_debounced(&mut self, now: Instant) -> Option<String> {
        let released = self.debouncer.poll(now);
        if released.is_some() {
            self.dirty = true;
        }
        released
    }

    pub(crate) fn is_last_processed(&self, text: &str) -> bool {
        self.last_processed.as_deref() == Some(text)
    }

    /// Starts a new generation for `text`; everything tagged earlier is stale from here on.
    pub(crate) fn begin_generation(&mut self, text: String) -> Generation {
        self.generation += 1;
        self.last_processed = Some(text);
        self.dirty = true;
        self.generation
    }

    pub(crate) fn set_rejected(&mut self, reason: RejectReason) {
        self.validation = Some(ValidationOutcome::Rejected(reason));
        self.probe = ProbeStatus::NotRequested;
    }

    pub(crate) fn set_accepted(&mut self, url: CandidateUrl) {
        self.validation = Some(ValidationOutcome::Accepted(url));
        self.probe = ProbeStatus::Pending;
    }

    pub(crate) fn probe_started(&mut self) {
        self.probes_in_flight += 1;
        self.dirty = true;
    }

    /// Applies a finished probe. Returns `false` when the result was stale and dropped.
    pub(crate) fn probe_finished(
        &mut self,
        generation: Generation,
        outcome: Option<ProbeOutcome>,
    ) -> bool {
        self.probes_in_flight = self.probes_in_flight.saturating_sub(1);
        self.dirty = true;
        if generation != self.generation || self.probe != ProbeStatus::Pending {
            return false;
        }
        self.probe = match outcome {
            Some(outcome) => ProbeStatus::Finished(outcome),
            None => ProbeStatus::NotRequested,
        };
        true
    }

    /// Clears input and results. The generation keeps counting so that probes
    /// still on the wire stay stale, and in-flight probes are still tracked.
    pub(crate) fn reset(&mut self) {
        let mut debouncer = self.debouncer.clone();
        debouncer.clear();

        *self = Self {
            generation: self.generation + 1,
            probes_in_flight: self.probes_in_flight,
            debouncer,
            dirty: true,
            ..Self::default()
        };
    }
}
