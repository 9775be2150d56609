//! Background refresh scheduling.
//!
//! Two independent periodic tasks keep the caches warm: one polls the
//! wormhole directory, the other exchanges the refresh credential for a new
//! access token. Both absorb every failure into cache state and logs; the
//! next tick is the retry.
//!
//! A [`PeriodicTask`] is a cancellable repeating timer bound to a handler.
//! The handler is awaited to completion before the next tick is taken, and
//! ticks that would land while a cycle is still running are skipped rather
//! than queued, so cycles never overlap and cache writes happen in tick
//! completion order.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::cache::{ConnectionCache, TokenCache};
use crate::scout::ScoutClient;
use crate::sso::SsoClient;

type Job = Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Cancellable repeating timer bound to a refresh handler.
pub struct PeriodicTask {
    name: &'static str,
    interval: Duration,
    job: Job,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl PeriodicTask {
    /// Bind a handler to a repeating timer. The timer does not run until
    /// [`start`] is called.
    ///
    /// [`start`]: PeriodicTask::start
    pub fn new<F, Fut>(name: &'static str, interval: Duration, handler: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let job: Job = Arc::new(move || {
            Box::pin(handler()) as Pin<Box<dyn Future<Output = ()> + Send>>
        });
        Self {
            name,
            interval,
            job,
            handle: Mutex::new(None),
        }
    }

    /// Start the timer. The first cycle runs immediately; later cycles fire
    /// once per interval. No-op while already running, so lifecycle signals
    /// cannot double-schedule a task.
    pub fn start(&self) {
        let mut guard = self.handle.lock().expect("task handle lock");
        if guard.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        let job = Arc::clone(&self.job);
        let name = self.name;
        let every = self.interval;
        *guard = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                tracing::trace!(task = name, "refresh tick");
                job().await;
            }
        }));
        tracing::debug!(task = name, interval_secs = every.as_secs(), "task started");
    }

    /// Cancel future ticks, abandoning any in-flight cycle.
    pub fn stop(&self) {
        if let Some(handle) = self.handle.lock().expect("task handle lock").take() {
            handle.abort();
            tracing::debug!(task = self.name, "task stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .expect("task handle lock")
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Periodic fetch of the full wormhole directory.
pub struct ConnectionRefresher {
    scout: ScoutClient,
    cache: ConnectionCache,
}

impl ConnectionRefresher {
    pub fn new(scout: ScoutClient, cache: ConnectionCache) -> Self {
        Self { scout, cache }
    }

    /// One refresh cycle. Failures end up in cache state and the log, never
    /// in the caller's lap.
    pub async fn run_once(&self) {
        match self.scout.all_connections().await {
            Ok(connections) => {
                let count = connections.len();
                self.cache.record_success(connections).await;
                let fetch = self.cache.fetch_count().await;
                tracing::info!(connections = count, fetch, "refreshed wormhole directory");
            }
            Err(err) => {
                self.cache.record_failure().await;
                tracing::warn!(error = %err, "wormhole directory refresh failed");
            }
        }
    }
}

/// Periodic exchange of the refresh credential for an access token.
pub struct TokenRefresher {
    sso: SsoClient,
    cache: TokenCache,
}

impl TokenRefresher {
    pub fn new(sso: SsoClient, cache: TokenCache) -> Self {
        Self { sso, cache }
    }

    /// One exchange cycle, absorbing failures like [`ConnectionRefresher::run_once`].
    pub async fn run_once(&self) {
        match self.sso.exchange().await {
            Ok(token) => {
                self.cache.record_success(token.access_token).await;
                let fetch = self.cache.fetch_count().await;
                tracing::info!(fetch, "refreshed sso access token");
            }
            Err(err) => {
                self.cache.record_failure().await;
                tracing::warn!(error = %err, "sso token refresh failed");
            }
        }
    }
}

/// The set of periodic tasks, driven by the hosting application's lifecycle
/// signals.
#[derive(Default)]
pub struct RefreshSchedule {
    tasks: Vec<PeriodicTask>,
}

impl RefreshSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task with the schedule.
    pub fn with_task(mut self, task: PeriodicTask) -> Self {
        self.tasks.push(task);
        self
    }

    /// Timer for the connection directory poll.
    pub fn connection_task(refresher: ConnectionRefresher, every: Duration) -> PeriodicTask {
        let refresher = Arc::new(refresher);
        PeriodicTask::new("connection-directory", every, move || {
            let refresher = Arc::clone(&refresher);
            async move { refresher.run_once().await }
        })
    }

    /// Timer for the access-token exchange.
    pub fn token_task(refresher: TokenRefresher, every: Duration) -> PeriodicTask {
        let refresher = Arc::new(refresher);
        PeriodicTask::new("access-token", every, move || {
            let refresher = Arc::clone(&refresher);
            async move { refresher.run_once().await }
        })
    }

    /// The hosting application reported ready: start every task.
    pub fn on_ready(&self) {
        for task in &self.tasks {
            task.start();
        }
        tracing::info!(tasks = self.tasks.len(), "refresh schedule started");
    }

    /// The hosting application reconnected: restart any stopped task.
    pub fn on_resumed(&self) {
        for task in &self.tasks {
            task.start();
        }
        tracing::info!("refresh schedule resumed");
    }

    /// The hosting application disconnected: cancel every task.
    pub fn on_disconnected(&self) {
        for task in &self.tasks {
            task.stop();
        }
        tracing::info!("refresh schedule stopped");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting_task(interval: Duration, count: &Arc<AtomicUsize>) -> PeriodicTask {
        let count = Arc::clone(count);
        PeriodicTask::new("test", interval, move || {
            let count = Arc::clone(&count);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
            }
        })
    }

    #[tokio::test]
    async fn first_cycle_runs_immediately_and_repeats() {
        let count = Arc::new(AtomicUsize::new(0));
        let task = counting_task(Duration::from_millis(20), &count);

        task.start();
        tokio::time::sleep(Duration::from_millis(110)).await;
        task.stop();

        assert!(count.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn stop_cancels_future_ticks() {
        let count = Arc::new(AtomicUsize::new(0));
        let task = counting_task(Duration::from_millis(10), &count);

        task.start();
        tokio::time::sleep(Duration::from_millis(35)).await;
        task.stop();
        assert!(!task.is_running());

        let frozen = count.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), frozen);
    }

    #[tokio::test]
    async fn start_is_idempotent_while_running() {
        let count = Arc::new(AtomicUsize::new(0));
        // One-hour interval: only the immediate first cycle can fire.
        let task = counting_task(Duration::from_secs(3600), &count);

        task.start();
        task.start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        task.stop();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn schedule_restarts_after_disconnect() {
        let count = Arc::new(AtomicUsize::new(0));
        let schedule =
            RefreshSchedule::new().with_task(counting_task(Duration::from_secs(3600), &count));

        schedule.on_ready();
        tokio::time::sleep(Duration::from_millis(30)).await;
        schedule.on_disconnected();
        assert!(schedule.tasks.iter().all(|task| !task.is_running()));

        schedule.on_resumed();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(schedule.tasks.iter().all(|task| task.is_running()));
        schedule.on_disconnected();

        // One immediate cycle per start.
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
