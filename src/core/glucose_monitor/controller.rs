//! Monitor lifecycle: owns the single running sampler and the shared state.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Runtime;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::cooldown::CooldownGate;
use super::dispatcher::AlertDispatcher;
use super::run_state::RunState;
use super::sampler::Sampler;
use super::traits::{AlertSink, AuditLog, ReadingSource, SuggestionProvider};
use super::types::{MonitorConfig, MonitorStatus, StartOutcome, StopOutcome};
use crate::error::{MonitorError, Result};

/// How long `stop` waits for the sampler to acknowledge shutdown
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// The external collaborators, built once by the host
#[derive(Clone)]
pub struct MonitorServices {
    pub source: Arc<dyn ReadingSource>,
    pub suggestions: Arc<dyn SuggestionProvider>,
    pub sink: Arc<dyn AlertSink>,
    pub audit_log: Arc<dyn AuditLog>,
}

/// A launched sampler and the runtime it runs on
struct ActiveSampler {
    runtime: Runtime,
    shutdown_tx: watch::Sender<bool>,
    /// Receives once when the sampler loop has returned
    exited: mpsc::Receiver<()>,
    task: JoinHandle<()>,
    run: Arc<RunState>,
}

/// Owns the monitor lifecycle (`Stopped -> Running -> Stopped`).
///
/// The `active` slot is the only record of a running sampler; `start` and
/// `stop` check and change it under one lock, so two concurrent starts cannot
/// both launch a worker. Status and cooldown state live behind their own locks
/// and survive a stop, so the last known values stay readable.
///
/// `stop` blocks the calling thread for at most the stop timeout. It does not
/// enter the sampler's runtime, so it may be called from async code as well.
pub struct MonitorController {
    services: MonitorServices,
    status: Arc<Mutex<MonitorStatus>>,
    gate: Arc<Mutex<CooldownGate>>,
    active: Mutex<Option<ActiveSampler>>,
    /// The last stopped run; its tick may outlive a stop that timed out
    retired: Mutex<Option<Arc<RunState>>>,
    stop_timeout: Duration,
}

impl MonitorController {
    pub fn new(services: MonitorServices) -> Self {
        Self::with_stop_timeout(services, DEFAULT_STOP_TIMEOUT)
    }

    pub fn with_stop_timeout(services: MonitorServices, stop_timeout: Duration) -> Self {
        let status = MonitorStatus::default();
        let gate = CooldownGate::new(status.config.cooldown);
        Self {
            services,
            status: Arc::new(Mutex::new(status)),
            gate: Arc::new(Mutex::new(gate)),
            active: Mutex::new(None),
            retired: Mutex::new(None),
            stop_timeout,
        }
    }

    /// Deep copy of the current status
    pub fn status(&self) -> MonitorStatus {
        self.status.lock().clone()
    }

    pub fn is_running(&self) -> bool {
        self.active.lock().is_some()
    }

    /// Launch the sampler. A second start while running is a no-op, and so is a
    /// start while a tick from the previous run is still executing.
    ///
    /// Fails only for an invalid config or when the worker cannot be launched.
    pub fn start(&self, config: MonitorConfig) -> Result<StartOutcome> {
        let mut active = self.active.lock();

        if active.is_some() {
            return Ok(StartOutcome {
                started: false,
                status: self.status(),
                message: "Glucose monitor already running".to_string(),
            });
        }

        if let Some(previous) = self.retired.lock().as_ref() {
            if previous.is_ticking() {
                return Ok(StartOutcome {
                    started: false,
                    status: self.status(),
                    message: "Previous sample still in flight, try again shortly".to_string(),
                });
            }
        }

        config.validate()?;
        if config.interval_is_clamped() {
            log::info!(
                "Sampling interval {}s raised to the {}s minimum",
                config.sampling_interval.as_secs(),
                config.effective().sampling_interval.as_secs()
            );
        }
        let effective = config.effective();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .thread_name("glucose-sampler")
            .build()
            .map_err(|e| MonitorError::launch(e.to_string()))?;

        {
            let mut status = self.status.lock();
            status.running = true;
            status.config = effective;
            status.last_error = None;
        }
        self.gate.lock().set_cooldown(effective.cooldown);

        let run = Arc::new(RunState::new());
        let dispatcher = Arc::new(
            AlertDispatcher::new(
                effective,
                self.services.suggestions.clone(),
                self.services.audit_log.clone(),
                self.services.sink.clone(),
                self.gate.clone(),
                self.status.clone(),
            )
            .with_run_state(run.clone()),
        );
        let sampler = Sampler::new(
            self.services.source.clone(),
            dispatcher,
            self.status.clone(),
            effective.sampling_interval,
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (exited_tx, exited) = mpsc::sync_channel(1);
        let task = runtime.spawn(async move {
            sampler.run(shutdown_rx).await;
            let _ = exited_tx.send(());
        });

        *active = Some(ActiveSampler {
            runtime,
            shutdown_tx,
            exited,
            task,
            run,
        });

        log::info!(
            "Glucose monitor started (low: {}, high: {}, interval: {}s, cooldown: {}s)",
            effective.low_threshold,
            effective.high_threshold,
            effective.sampling_interval.as_secs(),
            effective.cooldown.as_secs()
        );

        Ok(StartOutcome {
            started: true,
            status: self.status(),
            message: "Glucose monitor started".to_string(),
        })
    }

    /// Signal the sampler and wait up to the stop timeout for it to exit.
    ///
    /// An in-flight tick is allowed to finish within that window. The monitor
    /// is marked stopped either way; on an overrun the error is recorded in
    /// `last_error`, the task is aborted and the run is retired so the late
    /// tick publishes nothing.
    pub fn stop(&self) -> StopOutcome {
        let mut active = self.active.lock();

        let Some(sampler) = active.take() else {
            return StopOutcome {
                stopped: false,
                status: self.status(),
                message: "Glucose monitor is not running".to_string(),
            };
        };

        let ActiveSampler {
            runtime,
            shutdown_tx,
            exited,
            task,
            run,
        } = sampler;

        // Receiver may already be gone if the task ended; nothing to signal then
        let _ = shutdown_tx.send(true);

        let stop_timeout = self.stop_timeout;
        let overrun = match exited.recv_timeout(stop_timeout) {
            Ok(()) => None,
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("Sampler exited abnormally");
                None
            }
            Err(RecvTimeoutError::Timeout) => {
                let message = format!(
                    "Sampler did not acknowledge shutdown within {}s",
                    stop_timeout.as_secs_f64()
                );
                log::warn!("{}", message);
                Some(message)
            }
        };

        {
            let mut status = self.status.lock();
            let _gate = self.gate.lock();
            run.retire();
            status.running = false;
            if let Some(message) = overrun {
                status.last_error = Some(message);
            }
        }

        task.abort();
        runtime.shutdown_background();
        *self.retired.lock() = Some(run);

        log::info!("Glucose monitor stopped");

        StopOutcome {
            stopped: true,
            status: self.status(),
            message: "Glucose monitor stopped".to_string(),
        }
    }
}

impl Drop for MonitorController {
    fn drop(&mut self) {
        if let Some(sampler) = self.active.get_mut().take() {
            let _ = sampler.shutdown_tx.send(true);
            sampler.run.retire();
            sampler.runtime.shutdown_background();
        }
    }
}
