//! Normalization of raw text into a candidate URL.

use std::fmt;

use thiserror::Error;
use url::Url;

/// Bare stubs that are rejected when the input is wholly contained in one of them.
const PREFIX_STUBS: [&str; 3] = ["http://www.", "https://www.", "www."];

const MIN_CHARS: usize = 3;
const DEFAULT_SCHEME_PREFIX: &str = "https://";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum RejectReason {
    #[error("url string was empty or less than 3 characters")]
    Empty,
    #[error("url string was prefix only")]
    PrefixOnly,
    #[error("url string contains whitespace")]
    Whitespace,
    #[error("url could not be created")]
    Malformed,
}

/// A well-formed `http`/`https` URL with a host, not yet known to be reachable.
///
/// Only [`validate`] creates these.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateUrl(Url);

impl CandidateUrl {
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    pub fn host_str(&self) -> Option<&str> {
        self.0.host_str()
    }

    pub fn into_url(self) -> Url {
        self.0
    }
}

impl fmt::Display for CandidateUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Rejected(RejectReason),
    Accepted(CandidateUrl),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }

    pub fn candidate(&self) -> Option<&CandidateUrl> {
        match self {
            ValidationOutcome::Accepted(url) => Some(url),
            ValidationOutcome::Rejected(_) => None,
        }
    }

    pub fn into_result(self) -> Result<CandidateUrl, RejectReason> {
        match self {
            ValidationOutcome::Accepted(url) => Ok(url),
            ValidationOutcome::Rejected(reason) => Err(reason),
        }
    }
}

/// Turns raw user text into a candidate URL or a rejection reason.
///
/// Checks run in order and stop at the first failure:
/// 1. fewer than three characters is [`RejectReason::Empty`];
/// 2. text wholly contained (case-insensitively) in `http://www.`, `https://www.`
///    or `www.` is [`RejectReason::PrefixOnly`];
/// 3. spaces are stripped, and any other whitespace left over is
///    [`RejectReason::Whitespace`];
/// 4. `https://` is prepended unless the text already names `http` or `https`;
/// 5. the result must parse as an `http`/`https` URL with a host, otherwise
///    [`RejectReason::Malformed`].
pub fn validate(raw: &str) -> ValidationOutcome {
    match normalize(raw) {
        Ok(url) => ValidationOutcome::Accepted(url),
        Err(reason) => ValidationOutcome::Rejected(reason),
    }
}

fn normalize(raw: &str) -> Result<CandidateUrl, RejectReason> {
    if raw.chars().count() < MIN_CHARS {
        return Err(RejectReason::Empty);
    }

    if is_prefix_only(raw) {
        return Err(RejectReason::PrefixOnly);
    }

    let stripped: String = raw.chars().filter(|c| *c != ' ').collect();
    if stripped.chars().any(char::is_whitespace) {
        return Err(RejectReason::Whitespace);
    }

    let with_scheme = if has_web_scheme(&stripped) {
        stripped
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{stripped}")
    };

    let url = Url::parse(&with_scheme).map_err(|_| RejectReason::Malformed)?;
    let web_scheme = matches!(url.scheme(), "http" | "https");
    let has_host = url.host_str().is_some_and(|host| !host.is_empty());
    if !web_scheme || !has_host {
        return Err(RejectReason::Malformed);
    }

    Ok(CandidateUrl(url))
}

fn is_prefix_only(raw: &str) -> bool {
    let lowered = raw.to_lowercase();
    PREFIX_STUBS.iter().any(|stub| stub.contains(lowered.as_str()))
}

fn has_web_scheme(text: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        text.get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
    })
}
