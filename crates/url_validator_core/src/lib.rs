//! URL validator core: pure normalization, debounce and pipeline state machine,
//! plus the status broadcaster that presentation layers observe.
mod debounce;
mod effect;
mod msg;
mod state;
mod status;
mod update;
mod validate;
mod view_model;

pub use debounce::{Debouncer, DEFAULT_QUIET};
pub use effect::Effect;
pub use msg::Msg;
pub use state::{Generation, Phase, PipelineState, ProbeOutcome, ProbeStatus, UnreachableReason};
pub use status::{StatusBroadcaster, SubscriptionId};
pub use update::update;
pub use validate::{validate, CandidateUrl, RejectReason, ValidationOutcome};
pub use view_model::StatusSnapshot;
