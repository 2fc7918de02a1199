//! Timed sampling loop with cooperative cancellation.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

use super::dispatcher::{AlertDispatcher, DispatchOutcome};
use super::traits::ReadingSource;
use super::types::MonitorStatus;

/// Pulls a reading every tick and hands it to the dispatcher.
///
/// Ticks run one at a time on a blocking thread, so samples are processed in the
/// order they were fetched and a tick's status update lands before the next
/// fetch. The inter-tick wait races the shutdown signal, so stopping never waits
/// for the configured interval. A tick already in flight is awaited; the
/// controller bounds that wait.
#[derive(Clone)]
pub struct Sampler {
    source: Arc<dyn ReadingSource>,
    dispatcher: Arc<AlertDispatcher>,
    status: Arc<Mutex<MonitorStatus>>,
    interval: Duration,
}

impl Sampler {
    /// The interval is used as given; clamping belongs to the controller
    pub fn new(
        source: Arc<dyn ReadingSource>,
        dispatcher: Arc<AlertDispatcher>,
        status: Arc<Mutex<MonitorStatus>>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            dispatcher,
            status,
            interval,
        }
    }

    /// One fetch + dispatch. A failed fetch is recorded and yields no outcome.
    pub fn tick(&self, now: DateTime<Local>) -> Option<DispatchOutcome> {
        let run = self.dispatcher.run_state();
        let _in_flight = run.begin_tick();

        match self.source.fetch() {
            Ok(value) => Some(self.dispatcher.dispatch(value, now)),
            Err(e) => {
                log::warn!("{}", e);
                let mut status = self.status.lock();
                if !run.is_live() {
                    return None;
                }
                status.last_check_at = Some(now);
                status.last_value = None;
                status.last_error = Some(e.to_string());
                None
            }
        }
    }

    /// Run until the shutdown signal flips to `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        log::info!(
            "Sampler started (interval: {}s)",
            self.interval.as_secs_f64()
        );

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    let sampler = self.clone();
                    let work = tokio::task::spawn_blocking(move || {
                        sampler.tick(Local::now());
                    });

                    if let Err(e) = work.await {
                        log::error!("Sampler tick failed: {}", e);
                        let mut status = self.status.lock();
                        if self.dispatcher.run_state().is_live() {
                            status.last_error = Some(format!("Sampler tick failed: {}", e));
                        }
                    }
                }
                _ = shutdown.changed() => break,
            }
        }

        log::info!("Sampler stopped");
    }
}
