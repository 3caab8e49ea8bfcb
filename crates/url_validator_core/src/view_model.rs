use url::Url;

use crate::Phase;

/// Everything a presentation layer reads, captured at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    pub network_activity: bool,
    pub is_valid_url: bool,
    pub is_reachable_url: bool,
    pub validated_url: Option<Url>,
    pub phase: Phase,
}
