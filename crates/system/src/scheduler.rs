//! Periodic job executor on the Tokio runtime.
//!
//! Each job runs in its own task. The callback executes on the blocking pool
//! so slow counter reads never stall the runtime, and the task awaits it
//! before polling the timer again, so invocations of one job never overlap.
//! Ticks that come due while the callback is still running are skipped: the
//! next tick is always one full interval after the previous callback returns.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Opaque handle returned by [`Scheduler::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(u64);

struct Job {
    name:   String,
    cancel: CancellationToken,
    task:   JoinHandle<()>,
}

#[derive(Default)]
pub struct Scheduler {
    next_id: AtomicU64,
    jobs:    Mutex<HashMap<JobId, Job>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` every `interval`, starting one interval from now.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, name: impl Into<String>, interval: Duration, callback: F) -> JobId
    where
        F: FnMut() + Send + 'static,
    {
        let id = JobId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let name = name.into();
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run_job(name.clone(), interval, callback, cancel.clone()));
        debug!("Scheduled job '{name}' every {interval:?}");

        self.jobs.lock().insert(id, Job { name, cancel, task });
        id
    }

    /// Signal the job to stop without waiting for it. No-op for unknown ids.
    pub fn cancel(&self, id: JobId) {
        if let Some(job) = self.jobs.lock().get(&id) {
            job.cancel.cancel();
        }
    }

    /// Stop the job and wait until any in-flight invocation has returned and
    /// the callback has been dropped. No-op for unknown or stopped ids.
    pub async fn stop(&self, id: JobId) {
        let Some(job) = self.jobs.lock().remove(&id) else {
            return;
        };

        job.cancel.cancel();
        if let Err(e) = job.task.await {
            warn!("Job '{}' ended abnormally: {e}", job.name);
        }
        debug!("Stopped job '{}'", job.name);
    }

    /// Stop every registered job.
    pub async fn stop_all(&self) {
        let ids: Vec<JobId> = self.jobs.lock().keys().copied().collect();
        for id in ids {
            self.stop(id).await;
        }
    }

    pub fn is_scheduled(&self, id: JobId) -> bool {
        self.jobs.lock().contains_key(&id)
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        for job in self.jobs.get_mut().values() {
            job.cancel.cancel();
        }
    }
}

async fn run_job<F>(name: String, interval: Duration, callback: F, cancel: CancellationToken)
where
    F: FnMut() + Send + 'static,
{
    let callback = Arc::new(Mutex::new(callback));
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let callback = Arc::clone(&callback);
                let result = tokio::task::spawn_blocking(move || {
                    let mut callback = callback.lock();
                    (*callback)()
                })
                .await;

                if let Err(e) = result {
                    warn!("Job '{name}' tick failed: {e}");
                }

                // Drop any deadline that passed while the callback ran.
                ticker.reset();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    const TICK: Duration = Duration::from_millis(20);

    #[tokio::test]
    async fn ticks_repeatedly_until_stopped() {
        let scheduler = Scheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);

        let id = scheduler.schedule("count", TICK, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(scheduler.is_scheduled(id));

        time::sleep(TICK * 8).await;
        scheduler.stop(id).await;
        let after_stop = count.load(Ordering::SeqCst);
        assert!(after_stop >= 2, "expected several ticks, got {after_stop}");

        time::sleep(TICK * 4).await;
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
        assert!(!scheduler.is_scheduled(id));
    }

    #[tokio::test]
    async fn first_tick_waits_one_interval() {
        let scheduler = Scheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);

        let id = scheduler.schedule("late", Duration::from_millis(200), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        scheduler.stop(id).await;
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let scheduler = Scheduler::new();
        let id = scheduler.schedule("noop", TICK, || {});

        scheduler.stop(id).await;
        scheduler.stop(id).await;
        scheduler.cancel(id);
        scheduler.stop(JobId(9_999)).await;
    }

    #[tokio::test]
    async fn slow_callback_never_overlaps() {
        let scheduler = Scheduler::new();
        let running = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let (r, m) = (Arc::clone(&running), Arc::clone(&max_seen));

        let id = scheduler.schedule("slow", Duration::from_millis(5), move || {
            let now = r.fetch_add(1, Ordering::SeqCst) + 1;
            m.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(30));
            r.fetch_sub(1, Ordering::SeqCst);
        });

        time::sleep(Duration::from_millis(200)).await;
        scheduler.stop(id).await;
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert_eq!(running.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn overdue_tick_is_skipped_not_queued() {
        let scheduler = Scheduler::new();
        let origin = std::time::Instant::now();
        let starts = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&starts);

        let id = scheduler.schedule("slow-consumer", Duration::from_millis(100), move || {
            recorded.lock().push(origin.elapsed().as_millis());
            std::thread::sleep(Duration::from_millis(150));
        });

        time::sleep(Duration::from_millis(1_000)).await;
        scheduler.stop(id).await;

        let starts = starts.lock().clone();
        assert!(starts.len() >= 3, "expected several ticks, got {starts:?}");
        for gap in starts.windows(2).map(|w| w[1] - w[0]) {
            assert!(gap >= 240, "tick ran {gap} ms after the previous one: {starts:?}");
        }
    }

    #[tokio::test]
    async fn stop_all_clears_every_job() {
        let scheduler = Scheduler::new();
        let first = scheduler.schedule("first", TICK, || {});
        let second = scheduler.schedule("second", TICK, || {});
        assert!(scheduler.is_scheduled(first) && scheduler.is_scheduled(second));

        scheduler.stop_all().await;

        assert!(!scheduler.is_scheduled(first));
        assert!(!scheduler.is_scheduled(second));
        scheduler.stop_all().await;
    }

    #[tokio::test]
    async fn panicking_callback_keeps_ticking() {
        let scheduler = Scheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);

        let id = scheduler.schedule("flaky", TICK, move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("first tick fails");
            }
        });

        time::sleep(TICK * 8).await;
        scheduler.stop(id).await;
        assert!(count.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn stop_waits_for_in_flight_tick_and_drops_callback() {
        let scheduler = Scheduler::new();
        let finished = Arc::new(AtomicUsize::new(0));
        let guard = Arc::new(());
        let (f, g) = (Arc::clone(&finished), Arc::clone(&guard));

        let id = scheduler.schedule("long", Duration::from_millis(10), move || {
            let _held = &g;
            std::thread::sleep(Duration::from_millis(60));
            f.fetch_add(1, Ordering::SeqCst);
        });

        time::sleep(Duration::from_millis(30)).await;
        scheduler.stop(id).await;

        assert!(finished.load(Ordering::SeqCst) >= 1);
        assert_eq!(Arc::strong_count(&guard), 1);
    }
}
