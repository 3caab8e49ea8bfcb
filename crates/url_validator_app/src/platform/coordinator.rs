use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use url_validator_core::{update, Msg, PipelineState, StatusBroadcaster};
use url_validator_engine::{Prober, ReqwestProber};
use validator_logging::{validator_debug, validator_error};

use super::config::AppConfig;
use super::effects::EffectRunner;
use crate::AppError;

/// Everything the coordinator thread consumes, in arrival order.
pub(crate) enum Inbox {
    Msg(Msg),
    Shutdown,
}

/// Owns the validation pipeline: one thread applies text edits, debounce
/// wake-ups and probe events to the state machine one at a time, runs the
/// resulting effects and publishes the view to the [`StatusBroadcaster`].
pub struct Coordinator {
    inbox_tx: mpsc::Sender<Inbox>,
    status: Arc<StatusBroadcaster>,
    worker: Option<thread::JoinHandle<()>>,
}

impl Coordinator {
    /// Starts a coordinator that probes with a real HTTP client.
    pub fn spawn(config: &AppConfig, status: Arc<StatusBroadcaster>) -> Result<Self, AppError> {
        let prober = Arc::new(ReqwestProber::new(config.probe_settings()));
        Self::with_prober(config, status, prober)
    }

    pub fn with_prober(
        config: &AppConfig,
        status: Arc<StatusBroadcaster>,
        prober: Arc<dyn Prober>,
    ) -> Result<Self, AppError> {
        let (inbox_tx, inbox_rx) = mpsc::channel();
        let runner = EffectRunner::new(prober, inbox_tx.clone())?;
        let state = PipelineState::with_quiet_interval(config.debounce());
        let loop_status = status.clone();

        let worker = thread::Builder::new()
            .name("url-coordinator".to_string())
            .spawn(move || run_loop(state, &inbox_rx, &runner, &loop_status))?;

        let coordinator = Self {
            inbox_tx,
            status,
            worker: Some(worker),
        };
        // The field's initial content; the debouncer drops it.
        coordinator.set_text(String::new());
        Ok(coordinator)
    }

    /// Feeds the full current text of the input field.
    pub fn set_text(&self, text: impl Into<String>) {
        self.send(Msg::TextEdited {
            text: text.into(),
            at: Instant::now(),
        });
    }

    /// Clears input and results; probes still running are cancelled and ignored.
    pub fn reset(&self) {
        self.send(Msg::Reset);
    }

    pub fn status(&self) -> &Arc<StatusBroadcaster> {
        &self.status
    }

    /// Stops the coordinator thread and the probe engine behind it.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn send(&self, msg: Msg) {
        if self.inbox_tx.send(Inbox::Msg(msg)).is_err() {
            validator_error!("coordinator thread is gone; dropping input");
        }
    }

    fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        let _ = self.inbox_tx.send(Inbox::Shutdown);
        if worker.join().is_err() {
            validator_error!("coordinator thread panicked");
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(
    mut state: PipelineState,
    inbox_rx: &mpsc::Receiver<Inbox>,
    runner: &EffectRunner,
    status: &StatusBroadcaster,
) {
    while let Some(Inbox::Msg(msg)) = next_message(&state, inbox_rx) {
        let (next, effects) = update(state, msg);
        state = next;
        validator_logging::set_generation(state.generation());
        runner.run(effects);
        if state.consume_dirty() {
            status.publish(state.view());
        }
    }
    validator_debug!("coordinator stopped");
}

/// Blocks for the next inbox item, or synthesizes a tick when the debounce deadline passes.
///
/// Items already queued always come before a tick, so an edit typed inside the
/// quiet window is applied even when the loop fell behind its deadline.
fn next_message(state: &PipelineState, inbox_rx: &mpsc::Receiver<Inbox>) -> Option<Inbox> {
    let Some(deadline) = state.next_deadline() else {
        return inbox_rx.recv().ok();
    };

    let now = Instant::now();
    if deadline <= now {
        return match inbox_rx.try_recv() {
            Ok(item) => Some(item),
            Err(TryRecvError::Empty) => Some(Inbox::Msg(Msg::Tick { now })),
            Err(TryRecvError::Disconnected) => None,
        };
    }
    match inbox_rx.recv_timeout(deadline - now) {
        Ok(item) => Some(item),
        Err(RecvTimeoutError::Timeout) => Some(Inbox::Msg(Msg::Tick {
            now: Instant::now(),
        })),
        Err(RecvTimeoutError::Disconnected) => None,
    }
}
