//! Repeating refresh task and page lifecycle.
//!
//! A `Poller` owns at most one background task per page. The task runs a
//! refresh immediately and then once per interval until it is stopped.
//! `PageController` maps page lifecycle events (ready, unload, hidden,
//! visible) onto the poller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Something that can be refreshed on a timer.
#[async_trait]
pub trait Refresh: Send + Sync + 'static {
    fn name(&self) -> String;

    fn interval(&self) -> Duration;

    /// One refresh cycle. Errors are the implementor's business.
    async fn tick(&self);

    /// Notified when automatic updates are paused or resumed.
    async fn auto_update_changed(&self, _enabled: bool) {}
}

/// Cancellable repeating task.
pub struct Poller {
    name: String,
    interval: Duration,
    running: Option<(JoinHandle<()>, oneshot::Sender<()>)>,
    /// Task stopped last, possibly still finishing its cycle.
    draining: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn new(name: impl Into<String>, interval: Duration) -> Self {
        Self {
            name: name.into(),
            // tokio intervals must be non-zero
            interval: interval.max(Duration::from_millis(1)),
            running: None,
            draining: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|(handle, _)| !handle.is_finished())
    }

    /// Starts polling `target`: one refresh now, then one per interval.
    ///
    /// A poller that is already running is restarted, so there is never more
    /// than one task. The new task waits for the stopped one to finish its
    /// in-flight refresh, so refreshes never overlap. Missed ticks are not
    /// caught up.
    pub fn start(&mut self, target: Arc<dyn Refresh>) {
        if self.running.is_some() {
            self.stop();
        }

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let period = self.interval;
        let name = self.name.clone();
        let previous = self.draining.take();

        let handle = tokio::spawn(async move {
            if let Some(previous) = previous {
                let _ = previous.await;
            }

            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;

                    _ = &mut shutdown_rx => {
                        debug!(poller = %name, "Poller stopped");
                        break;
                    }

                    _ = ticker.tick() => {
                        target.tick().await;
                    }
                }
            }
        });

        info!(poller = %self.name, interval_ms = period.as_millis() as u64, "Poller started");
        self.running = Some((handle, shutdown_tx));
    }

    /// Cancels future ticks. A refresh already in flight runs to completion.
    /// Returns `false` when the poller was not running.
    pub fn stop(&mut self) -> bool {
        match self.running.take() {
            Some((handle, shutdown_tx)) => {
                // The task may have ended on its own; nothing to signal then.
                let _ = shutdown_tx.send(());
                self.draining = Some(handle);
                true
            }
            None => false,
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Whether the page is currently being looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Lifecycle glue between a page and its poller.
pub struct PageController {
    target: Arc<dyn Refresh>,
    poller: Mutex<Poller>,
}

impl PageController {
    pub fn new(target: Arc<dyn Refresh>) -> Self {
        let poller = Poller::new(target.name(), target.interval());
        Self {
            target,
            poller: Mutex::new(poller),
        }
    }

    pub fn name(&self) -> String {
        self.target.name()
    }

    fn with_poller<R>(&self, f: impl FnOnce(&mut Poller) -> R) -> R {
        let mut poller = self.poller.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut poller)
    }

    /// Page is ready: start polling.
    pub fn ready(&self) {
        let target = self.target.clone();
        self.with_poller(|p| p.start(target));
    }

    /// Page is going away: stop polling.
    pub fn unload(&self) -> bool {
        self.with_poller(Poller::stop)
    }

    pub fn is_running(&self) -> bool {
        self.with_poller(|p| p.is_running())
    }

    /// Pauses polling while hidden and resumes with a fresh cycle when the
    /// page becomes visible again.
    pub async fn on_visibility(&self, visibility: Visibility) {
        match visibility {
            Visibility::Hidden => {
                if self.unload() {
                    info!(page = %self.name(), "Page hidden, auto update paused");
                }
                self.target.auto_update_changed(false).await;
            }
            Visibility::Visible => {
                self.ready();
                self.target.auto_update_changed(true).await;
            }
        }
    }
}

/// Spawns the optional pause-when-hidden policy for a set of pages.
///
/// Every change on `signal` is forwarded to all controllers. The task ends
/// when the sender side is dropped.
pub fn spawn_visibility_policy(
    controllers: Vec<Arc<PageController>>,
    mut signal: watch::Receiver<Visibility>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while signal.changed().await.is_ok() {
            let visibility = *signal.borrow_and_update();
            debug!(?visibility, pages = controllers.len(), "Visibility changed");
            for controller in &controllers {
                controller.on_visibility(visibility).await;
            }
        }
    })
}
