use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use url::Url;
use validator_logging::validator_debug;

use crate::{EngineEvent, FailureKind, ProbeError, ProbeResponse};

#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            redirect_limit: 10,
        }
    }
}

/// Receives engine events; called from runtime worker threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    /// One header-only request to `url`. `Ok` only for reachable statuses.
    async fn probe(&self, url: &Url) -> Result<ProbeResponse, ProbeError>;
}

/// Statuses that count as "a server is there": 2xx, 3xx, and 405 from servers refusing HEAD.
pub fn is_reachable_status(status: u16) -> bool {
    (200..400).contains(&status) || status == 405
}

#[derive(Debug, Clone)]
pub struct ReqwestProber {
    settings: ProbeSettings,
}

impl ReqwestProber {
    pub fn new(settings: ProbeSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self, redirect_counter: Arc<AtomicUsize>) -> Result<reqwest::Client, ProbeError> {
        let redirect_limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            let count = attempt.previous().len();
            redirect_counter.store(count, Ordering::Relaxed);
            if count > redirect_limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });

        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(policy)
            .build()
            .map_err(|err| ProbeError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Prober for ReqwestProber {
    async fn probe(&self, url: &Url) -> Result<ProbeResponse, ProbeError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ProbeError::new(
                FailureKind::InvalidUrl,
                format!("unsupported scheme {}", url.scheme()),
            ));
        }
        let redirect_counter = Arc::new(AtomicUsize::new(0));
        let client = self.build_client(redirect_counter.clone())?;

        let response = client
            .head(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        validator_debug!("HEAD {} -> {} ({})", url, status, final_url);
        if !is_reachable_status(status) {
            return Err(ProbeError::new(
                FailureKind::HttpStatus(status),
                response.status().to_string(),
            ));
        }

        Ok(ProbeResponse {
            requested_url: url.clone(),
            final_url,
            status,
            redirect_count: redirect_counter.load(Ordering::Relaxed),
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ProbeError {
    if err.is_timeout() {
        return ProbeError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return ProbeError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    if err.is_builder() {
        return ProbeError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ProbeError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reachable_status_table() {
        for status in [200, 204, 301, 302, 399, 405] {
            assert!(is_reachable_status(status), "{status}");
        }
        for status in [100, 199, 400, 401, 403, 404, 406, 500, 503] {
            assert!(!is_reachable_status(status), "{status}");
        }
    }

    #[tokio::test]
    async fn non_web_scheme_is_invalid() {
        let prober = ReqwestProber::new(ProbeSettings::default());
        let url = Url::parse("ftp://example.com/file").unwrap();
        let err = prober.probe(&url).await.unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }
}
