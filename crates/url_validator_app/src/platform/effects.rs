use std::sync::{mpsc, Arc};

use url_validator_core::{Effect, Msg, ProbeOutcome, UnreachableReason};
use url_validator_engine::{
    EngineEvent, EngineHandle, EventSink, FailureKind, ProbeError, ProbeId, ProbeResponse, Prober,
};
use validator_logging::{validator_info, validator_warn};

use super::coordinator::Inbox;
use crate::AppError;

/// Executes state-machine effects against the probe engine.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub(crate) fn new(prober: Arc<dyn Prober>, inbox: mpsc::Sender<Inbox>) -> Result<Self, AppError> {
        let engine = EngineHandle::with_prober(prober, Arc::new(InboxSink { inbox }))?;
        Ok(Self { engine })
    }

    pub(crate) fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartProbe { generation, url } => {
                    validator_info!("StartProbe generation={} url={}", generation, url);
                    self.engine.probe(generation, url.into_url());
                }
                Effect::CancelProbe { generation } => {
                    self.engine.cancel(generation);
                }
            }
        }
    }
}

/// Routes engine events back into the coordinator's inbox.
struct InboxSink {
    inbox: mpsc::Sender<Inbox>,
}

impl EventSink for InboxSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.inbox.send(Inbox::Msg(map_event(event)));
    }
}

/// Probe ids are the pipeline generations that requested them.
fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ProbeStarted { probe_id } => Msg::ProbeStarted {
            generation: probe_id,
        },
        EngineEvent::ProbeFinished { probe_id, result } => Msg::ProbeFinished {
            generation: probe_id,
            outcome: map_result(probe_id, result),
        },
    }
}

fn map_result(probe_id: ProbeId, result: Result<ProbeResponse, ProbeError>) -> Option<ProbeOutcome> {
    match result {
        Ok(response) => Some(ProbeOutcome::Reachable(response.final_url)),
        Err(err) if err.kind == FailureKind::Cancelled => None,
        Err(err) => {
            validator_warn!("Probe {} unreachable: {}", probe_id, err);
            let reason = if err.is_server_error() {
                UnreachableReason::ServerError
            } else {
                UnreachableReason::TransportError
            };
            Some(ProbeOutcome::Unreachable(reason))
        }
    }
}
