use std::sync::{Arc, Mutex, Once};
use std::time::{Duration, Instant};

use url::Url;
use url_validator_app::{AppConfig, Coordinator, LogDestination};
use url_validator_core::{Phase, StatusBroadcaster, StatusSnapshot};
use url_validator_engine::{FailureKind, ProbeError, ProbeResponse, Prober};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(validator_logging::initialize_for_tests);
}

fn fast_config() -> AppConfig {
    AppConfig {
        debounce_ms: 50,
        request_timeout_ms: 2_000,
        log_destination: LogDestination::Off,
        ..AppConfig::default()
    }
}

/// Answers from a fixed table and records every URL it was asked about.
#[derive(Default)]
struct ScriptedProber {
    calls: Mutex<Vec<String>>,
}

impl ScriptedProber {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, url: &Url) -> Result<ProbeResponse, ProbeError> {
        self.calls.lock().unwrap().push(url.to_string());
        let host = url.host_str().unwrap_or_default().to_string();
        if host.starts_with("slow.") {
            tokio::time::sleep(Duration::from_millis(400)).await;
        }
        if host.starts_with("down.") {
            return Err(ProbeError {
                kind: FailureKind::HttpStatus(503),
                message: "service unavailable".to_string(),
            });
        }
        Ok(ProbeResponse {
            requested_url: url.clone(),
            final_url: url.clone(),
            status: 200,
            redirect_count: 0,
        })
    }
}

fn start(prober: Arc<ScriptedProber>) -> (Coordinator, Arc<StatusBroadcaster>) {
    init_logging();
    let status = Arc::new(StatusBroadcaster::new());
    let coordinator =
        Coordinator::with_prober(&fast_config(), status.clone(), prober).expect("coordinator");
    (coordinator, status)
}

fn wait_until(status: &StatusBroadcaster, what: &str, check: impl Fn(&StatusSnapshot) -> bool) {
    let deadline = Instant::now() + WAIT;
    loop {
        let snapshot = status.snapshot();
        if check(&snapshot) {
            return;
        }
        assert!(Instant::now() < deadline, "timed out waiting for {what}: {snapshot:?}");
        std::thread::sleep(Duration::from_millis(10));
    }
}

fn settle(config: &AppConfig) {
    std::thread::sleep(config.debounce() * 4);
}

#[test]
fn bare_domain_is_validated_and_probed_over_https() {
    let prober = Arc::new(ScriptedProber::default());
    let (coordinator, status) = start(prober.clone());

    coordinator.set_text("example.com");
    wait_until(&status, "reachable", |s| s.is_reachable_url && !s.network_activity);

    let snapshot = status.snapshot();
    assert!(snapshot.is_valid_url);
    assert_eq!(
        snapshot.validated_url.unwrap().as_str(),
        "https://example.com/"
    );
    assert_eq!(prober.calls(), vec!["https://example.com/".to_string()]);
}

#[test]
fn prefix_only_input_never_touches_the_network() {
    let prober = Arc::new(ScriptedProber::default());
    let (coordinator, status) = start(prober.clone());
    let activity = Arc::new(Mutex::new(Vec::new()));
    let seen = activity.clone();
    status.subscribe_network_activity(move |active| seen.lock().unwrap().push(*active));

    coordinator.set_text("www.");
    settle(&fast_config());

    let snapshot = status.snapshot();
    assert!(!snapshot.is_valid_url);
    assert!(!snapshot.network_activity);
    assert!(prober.calls().is_empty());
    assert!(activity.lock().unwrap().is_empty());
}

#[test]
fn typing_burst_issues_a_single_probe() {
    let prober = Arc::new(ScriptedProber::default());
    let (coordinator, status) = start(prober.clone());

    for text in ["e", "ex", "exa", "exam", "example", "example.", "example.org"] {
        coordinator.set_text(text);
    }
    wait_until(&status, "reachable", |s| s.is_reachable_url);
    settle(&fast_config());

    assert_eq!(prober.calls(), vec!["https://example.org/".to_string()]);
}

#[test]
fn network_activity_rises_and_falls_once_per_probe() {
    let prober = Arc::new(ScriptedProber::default());
    let (coordinator, status) = start(prober);
    let activity = Arc::new(Mutex::new(Vec::new()));
    let seen = activity.clone();
    status.subscribe_network_activity(move |active| seen.lock().unwrap().push(*active));

    coordinator.set_text("slow.example.com");
    wait_until(&status, "probe finished", |s| s.is_reachable_url);
    wait_until(&status, "activity off", |s| !s.network_activity);

    assert_eq!(*activity.lock().unwrap(), vec![true, false]);
}

#[test]
fn newer_edit_wins_over_slow_earlier_check() {
    let prober = Arc::new(ScriptedProber::default());
    let (coordinator, status) = start(prober.clone());

    coordinator.set_text("slow.example.com");
    wait_until(&status, "slow check in flight", |s| s.network_activity);
    coordinator.set_text("down.example.com");
    let asked = prober.clone();
    wait_until(&status, "second cycle settled", |s| {
        asked.calls().len() == 2 && s.is_valid_url && !s.network_activity && s.phase == Phase::Idle
    });

    // Give the superseded request time to have answered, had it not been cancelled.
    std::thread::sleep(Duration::from_millis(500));
    let snapshot = status.snapshot();
    assert!(snapshot.is_valid_url);
    assert!(!snapshot.is_reachable_url);
    assert_eq!(snapshot.validated_url, None);
    assert_eq!(
        prober.calls(),
        vec![
            "https://slow.example.com/".to_string(),
            "https://down.example.com/".to_string(),
        ]
    );
}

#[test]
fn slow_observer_does_not_let_intermediate_edit_through() {
    let prober = Arc::new(ScriptedProber::default());
    let (coordinator, status) = start(prober.clone());
    // Observers run on the coordinator thread, so this one holds the loop up.
    status.subscribe_valid(|_| std::thread::sleep(Duration::from_millis(300)));

    coordinator.set_text("a.example.com");
    std::thread::sleep(Duration::from_millis(120));
    coordinator.set_text("b.example.com");
    std::thread::sleep(Duration::from_millis(10));
    coordinator.set_text("c.example.com");

    wait_until(&status, "last edit reachable", |s| {
        s.is_reachable_url
            && s.validated_url.as_ref().map(Url::as_str) == Some("https://c.example.com/")
    });
    settle(&fast_config());

    assert_eq!(
        prober.calls(),
        vec![
            "https://a.example.com/".to_string(),
            "https://c.example.com/".to_string(),
        ]
    );
}

#[test]
fn invalid_edit_clears_previous_result() {
    let prober = Arc::new(ScriptedProber::default());
    let (coordinator, status) = start(prober);

    coordinator.set_text("example.com");
    wait_until(&status, "reachable", |s| s.is_reachable_url);
    coordinator.set_text("ex");
    wait_until(&status, "cleared", |s| !s.is_valid_url);

    let snapshot = status.snapshot();
    assert!(!snapshot.is_reachable_url);
    assert_eq!(snapshot.validated_url, None);
}

#[test]
fn reset_returns_to_defaults() {
    let prober = Arc::new(ScriptedProber::default());
    let (coordinator, status) = start(prober.clone());

    coordinator.set_text("example.com");
    wait_until(&status, "reachable", |s| s.is_reachable_url);
    coordinator.reset();
    wait_until(&status, "defaults", |s| *s == StatusSnapshot::default());

    // The same text counts as new input after a reset.
    coordinator.set_text("example.com");
    wait_until(&status, "reachable again", |s| s.is_reachable_url);
    assert_eq!(prober.calls().len(), 2);
}

#[test]
fn shutdown_stops_cleanly_with_probe_in_flight() {
    let prober = Arc::new(ScriptedProber::default());
    let (coordinator, status) = start(prober);

    coordinator.set_text("slow.example.com");
    wait_until(&status, "probe in flight", |s| s.network_activity);
    coordinator.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn live_server_reachability_end_to_end() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let status = Arc::new(StatusBroadcaster::new());
    let coordinator = Coordinator::spawn(&fast_config(), status.clone()).expect("coordinator");
    let base = server.uri();

    let up = format!("{base}/health");
    coordinator.set_text(up.clone());
    let waiter = status.clone();
    tokio::task::spawn_blocking(move || {
        wait_until(&waiter, "reachable", |s| s.is_reachable_url && !s.network_activity)
    })
    .await
    .unwrap();
    assert_eq!(status.validated_url().unwrap().as_str(), up);

    coordinator.set_text(format!("{base}/missing"));
    let waiter = status.clone();
    tokio::task::spawn_blocking(move || {
        wait_until(&waiter, "unreachable", |s| {
            s.is_valid_url && !s.is_reachable_url && !s.network_activity && s.phase == Phase::Idle
        })
    })
    .await
    .unwrap();
    assert!(status.is_valid_url());
    assert!(!status.is_reachable_url());
    assert_eq!(status.validated_url(), None);

    tokio::task::spawn_blocking(move || coordinator.shutdown())
        .await
        .unwrap();
}
