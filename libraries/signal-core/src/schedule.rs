//! Cancelable periodic tasks
//!
//! Both repeating loops of the station (the 1 Hz clock tick and the
//! display-rate frame tick) run as a `PeriodicTask`. The task only produces
//! ticks; the owner of the controller or sampler consumes them from its own
//! loop, so component state is never touched from the spawned task.
//!
//! Dropping or cancelling the handle aborts the spawned loop and discards any
//! tick that was produced but not yet consumed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// One firing of a periodic task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Zero-based firing count
    pub sequence: u64,

    /// When the interval fired
    pub at: Instant,
}

/// Owned handle to a spawned interval loop
///
/// Must be created inside a tokio runtime.
pub struct PeriodicTask {
    name: &'static str,
    period: Duration,
    handle: Option<JoinHandle<()>>,
    ticks: Option<mpsc::Receiver<Tick>>,
    invocations: Arc<AtomicU64>,
}

impl PeriodicTask {
    /// Spawn a loop that fires every `period`, starting immediately
    ///
    /// Missed ticks are skipped rather than bursted, so a stalled consumer
    /// sees one late tick instead of a backlog.
    pub fn spawn(name: &'static str, period: Duration) -> Self {
        let (tx, rx) = mpsc::channel(1);
        let invocations = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&invocations);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                let at = interval.tick().await;
                let sequence = counter.fetch_add(1, Ordering::SeqCst);

                if tx.send(Tick { sequence, at }).await.is_err() {
                    break;
                }
            }
        });

        tracing::debug!("Spawned periodic task '{}' every {:?}", name, period);

        Self {
            name,
            period,
            handle: Some(handle),
            ticks: Some(rx),
            invocations,
        }
    }

    /// Wait for the next tick
    ///
    /// Returns `None` once the task has been cancelled.
    pub async fn next_tick(&mut self) -> Option<Tick> {
        match self.ticks.as_mut() {
            Some(ticks) => ticks.recv().await,
            None => None,
        }
    }

    /// Stop the loop; idempotent
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("Cancelled periodic task '{}'", self.name);
        }
        self.ticks = None;
    }

    /// Whether the loop is still scheduled
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// How many times the interval has fired so far
    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::SeqCst)
    }

    /// Task name used in logs
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Configured period
    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for PeriodicTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeriodicTask")
            .field("name", &self.name)
            .field("period", &self.period)
            .field("running", &self.is_running())
            .finish()
    }
}
