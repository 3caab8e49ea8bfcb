use crate::{CandidateUrl, Generation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartProbe {
        generation: Generation,
        url: CandidateUrl,
    },
    CancelProbe { generation: Generation },
}
