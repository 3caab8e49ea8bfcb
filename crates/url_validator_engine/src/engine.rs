use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use url::Url;
use validator_logging::{validator_debug, validator_info};

use crate::probe::{EventSink, ProbeSettings, Prober, ReqwestProber};
use crate::{EngineError, EngineEvent, ProbeError, ProbeId};

const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

enum EngineCommand {
    Probe { probe_id: ProbeId, url: Url },
    Cancel { probe_id: ProbeId },
}

type InFlight = Arc<Mutex<HashMap<ProbeId, CancellationToken>>>;

/// Runs probes on a dedicated thread and reports back through an [`EventSink`].
///
/// Dropping the handle stops the engine; probes still running are abandoned
/// without a `ProbeFinished` event.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: ProbeSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        Self::with_prober(Arc::new(ReqwestProber::new(settings)), sink)
    }

    pub fn with_prober(
        prober: Arc<dyn Prober>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("probe-worker")
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::Builder::new()
            .name("probe-engine".to_string())
            .spawn(move || {
                let in_flight: InFlight = Arc::default();
                while let Ok(command) = cmd_rx.recv() {
                    handle_command(&runtime, &in_flight, &prober, &sink, command);
                }
                for token in lock(&in_flight).values() {
                    token.cancel();
                }
                runtime.shutdown_timeout(SHUTDOWN_GRACE);
                validator_debug!("probe engine stopped");
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn probe(&self, probe_id: ProbeId, url: Url) {
        let _ = self.cmd_tx.send(EngineCommand::Probe { probe_id, url });
    }

    /// Cancels a running probe. Unknown or finished ids are ignored.
    pub fn cancel(&self, probe_id: ProbeId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { probe_id });
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    in_flight: &InFlight,
    prober: &Arc<dyn Prober>,
    sink: &Arc<dyn EventSink>,
    command: EngineCommand,
) {
    match command {
        EngineCommand::Probe { probe_id, url } => {
            let token = CancellationToken::new();
            lock(in_flight).insert(probe_id, token.clone());
            let prober = prober.clone();
            let sink = sink.clone();
            let in_flight = in_flight.clone();
            runtime.spawn(async move {
                run_probe(prober.as_ref(), sink.as_ref(), probe_id, &url, &token).await;
                lock(&in_flight).remove(&probe_id);
            });
        }
        EngineCommand::Cancel { probe_id } => {
            if let Some(token) = lock(in_flight).get(&probe_id) {
                validator_info!("cancelling probe {}", probe_id);
                token.cancel();
            }
        }
    }
}

async fn run_probe(
    prober: &dyn Prober,
    sink: &dyn EventSink,
    probe_id: ProbeId,
    url: &Url,
    token: &CancellationToken,
) {
    sink.emit(EngineEvent::ProbeStarted { probe_id });
    let result = tokio::select! {
        biased;
        _ = token.cancelled() => Err(ProbeError::cancelled()),
        result = prober.probe(url) => result,
    };
    match &result {
        Ok(response) => validator_debug!("probe {} reachable at {}", probe_id, response.final_url),
        Err(err) => validator_debug!("probe {} failed: {}", probe_id, err),
    }
    sink.emit(EngineEvent::ProbeFinished { probe_id, result });
}

fn lock(in_flight: &InFlight) -> std::sync::MutexGuard<'_, HashMap<ProbeId, CancellationToken>> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}
