//! URL validator engine: reachability probes and their cancellable execution.
mod engine;
mod probe;
mod types;

pub use engine::EngineHandle;
pub use probe::{
    is_reachable_status, ChannelEventSink, EventSink, ProbeSettings, Prober, ReqwestProber,
};
pub use types::{EngineError, EngineEvent, FailureKind, ProbeError, ProbeId, ProbeResponse};
