use validator_logging::{validator_debug, validator_info};

use crate::{validate, Effect, Msg, PipelineState, ProbeStatus, ValidationOutcome};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PipelineState, msg: Msg) -> (PipelineState, Vec<Effect>) {
    let effects = match msg {
        Msg::TextEdited { text, at } => {
            // A pending edit whose quiet window closed before this one was typed fires first.
            let effects = match state.poll_debounced(at) {
                Some(earlier) => process_input(&mut state, earlier),
                None => Vec::new(),
            };
            state.record_edit(text, at);
            effects
        }
        Msg::Tick { now } => match state.poll_debounced(now) {
            Some(text) => process_input(&mut state, text),
            None => Vec::new(),
        },
        Msg::ProbeStarted { .. } => {
            state.probe_started();
            Vec::new()
        }
        Msg::ProbeFinished {
            generation,
            outcome,
        } => {
            let current = state.generation();
            if !state.probe_finished(generation, outcome) {
                validator_debug!(
                    "dropping stale probe result from generation {} (current {})",
                    generation,
                    current
                );
            }
            Vec::new()
        }
        Msg::Reset => {
            let effects = cancel_pending(&state);
            state.reset();
            effects
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Runs one debounced input through dedupe, validation and probe scheduling.
fn process_input(state: &mut PipelineState, text: String) -> Vec<Effect> {
    if state.is_last_processed(&text) {
        validator_debug!("input unchanged since last cycle; skipping");
        return Vec::new();
    }

    let mut effects = cancel_pending(state);
    let outcome = validate(&text);
    let generation = state.begin_generation(text);

    match outcome {
        ValidationOutcome::Rejected(reason) => {
            validator_info!("generation {} rejected: {}", generation, reason);
            state.set_rejected(reason);
        }
        ValidationOutcome::Accepted(url) => {
            validator_info!("generation {} accepted {}", generation, url);
            state.set_accepted(url.clone());
            effects.push(Effect::StartProbe { generation, url });
        }
    }
    effects
}

fn cancel_pending(state: &PipelineState) -> Vec<Effect> {
    if *state.probe() == ProbeStatus::Pending {
        vec![Effect::CancelProbe {
            generation: state.generation(),
        }]
    } else {
        Vec::new()
    }
}
