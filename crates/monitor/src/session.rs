//! Monitor session lifecycle: `Idle → Resolving → Active → Stopped`, with
//! `Failed` reachable from `Resolving`.

use crate::aggregator::SeriesAggregator;
use crate::resolver::{self, AdaptorBinding};
use crate::subscribers::{SubscriptionId, Subscribers};
use netmon_config::MonitorConfig;
use netmon_core::{
    CounterProvider, DisplayState, MonitorError, MonitorEvent, RenderSink, SessionState,
};
use netmon_system::{JobId, Scheduler};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One live throughput chart bound to a single adaptor.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct MonitorSession {
    inner: Arc<Inner>,
}

struct Inner {
    config:      MonitorConfig,
    provider:    Arc<dyn CounterProvider>,
    scheduler:   Scheduler,
    subscribers: Arc<Subscribers>,
    display:     Arc<Mutex<DisplayState>>,
    cancel:      CancellationToken,
    lifecycle:   Mutex<Lifecycle>,
}

#[derive(Default)]
struct Lifecycle {
    state:   SessionState,
    job:     Option<JobId>,
    adaptor: Option<String>,
}

impl MonitorSession {
    /// Create an idle session. Nothing is enumerated or opened until [`start`].
    ///
    /// [`start`]: MonitorSession::start
    pub fn new(config: MonitorConfig, provider: Arc<dyn CounterProvider>) -> Self {
        let display = SeriesAggregator::new(config.time_line).snapshot().clone();
        Self {
            inner: Arc::new(Inner {
                config,
                provider,
                scheduler:   Scheduler::new(),
                subscribers: Arc::new(Subscribers::new()),
                display:     Arc::new(Mutex::new(display)),
                cancel:      CancellationToken::new(),
                lifecycle:   Mutex::new(Lifecycle::default()),
            }),
        }
    }

    pub fn subscribe(&self, sink: Arc<dyn RenderSink>) -> SubscriptionId {
        self.inner.subscribers.subscribe(sink)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.subscribers.unsubscribe(id)
    }

    pub fn state(&self) -> SessionState {
        self.inner.lifecycle.lock().state
    }

    /// Latest published display state (the idle state before the first tick).
    pub fn display(&self) -> DisplayState {
        self.inner.display.lock().clone()
    }

    /// Name of the bound counter source while the session is active.
    pub fn adaptor_name(&self) -> Option<String> {
        self.inner.lifecycle.lock().adaptor.clone()
    }

    /// Resolve the adaptor and begin sampling.
    ///
    /// Never fails: a missing adaptor leaves the session in `Failed` and is
    /// reported to subscribers. Returns the state the session ended up in.
    /// Only valid from `Idle`; otherwise the call is ignored.
    pub async fn start(&self) -> SessionState {
        {
            let mut lifecycle = self.inner.lifecycle.lock();
            if lifecycle.state != SessionState::Idle {
                warn!("start() ignored: session is {}", lifecycle.state);
                return lifecycle.state;
            }
            lifecycle.state = SessionState::Resolving;
        }
        self.publish_state(SessionState::Resolving);

        let provider = Arc::clone(&self.inner.provider);
        let selector = self.inner.config.adaptor;
        let token = self.inner.cancel.clone();
        let resolving = tokio::task::spawn_blocking(move || {
            resolver::resolve(provider.as_ref(), selector, &token)
        });

        let outcome = tokio::select! {
            // The blocking task sees the same token and drops whatever it opened.
            _ = self.inner.cancel.cancelled() => Err(MonitorError::CancelledDuringResolution),
            joined = resolving => joined
                .map_err(|e| MonitorError::System(format!("resolver task failed: {e}")))
                .and_then(|resolved| resolved),
        };

        match outcome {
            Ok(binding) => self.activate(binding),
            Err(e) if !e.is_reportable() => {
                debug!("Adaptor resolution abandoned");
                self.state()
            }
            Err(e) => self.fail(e),
        }
    }

    /// Stop sampling and release the adaptor. Safe from any state, and safe to
    /// call repeatedly.
    ///
    /// Waits for an in-flight tick to finish; the counters are dropped only
    /// after it has.
    pub async fn stop(&self) {
        self.inner.cancel.cancel();

        let (job, previous) = {
            let mut lifecycle = self.inner.lifecycle.lock();
            let previous = lifecycle.state;
            lifecycle.state = SessionState::Stopped;
            lifecycle.adaptor = None;
            (lifecycle.job.take(), previous)
        };

        if let Some(job) = job {
            self.inner.scheduler.stop(job).await;
        }

        if previous != SessionState::Stopped {
            info!("Network monitor stopped (was {previous})");
            self.publish_state(SessionState::Stopped);
        }
    }

    fn activate(&self, binding: AdaptorBinding) -> SessionState {
        let name = binding.name().to_string();
        {
            let mut lifecycle = self.inner.lifecycle.lock();
            if lifecycle.state != SessionState::Resolving {
                debug!("Session left Resolving; releasing '{name}'");
                return lifecycle.state;
            }

            let interval = Duration::from_millis(self.inner.config.interval_ms.max(1));
            let sampler = sampler(
                binding,
                SeriesAggregator::new(self.inner.config.time_line),
                Arc::clone(&self.inner.subscribers),
                Arc::clone(&self.inner.display),
            );
            let job = self.inner.scheduler.schedule(format!("sample:{name}"), interval, sampler);

            lifecycle.state = SessionState::Active;
            lifecycle.job = Some(job);
            lifecycle.adaptor = Some(name.clone());
        }

        info!("Network monitor sampling '{name}'");
        self.publish_state(SessionState::Active);
        SessionState::Active
    }

    fn fail(&self, error: MonitorError) -> SessionState {
        {
            let mut lifecycle = self.inner.lifecycle.lock();
            if lifecycle.state != SessionState::Resolving {
                return lifecycle.state;
            }
            lifecycle.state = SessionState::Failed;
        }

        let reason = error.to_string();
        warn!("Network monitor unavailable: {reason}");
        self.publish_state(SessionState::Failed);
        self.inner.subscribers.publish(&MonitorEvent::Failed(reason));
        SessionState::Failed
    }

    fn publish_state(&self, state: SessionState) {
        self.inner.subscribers.publish(&MonitorEvent::StateChanged(state));
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// The per-tick job: read, aggregate, publish. Owns the binding, so the
/// counters live exactly as long as the scheduled job.
fn sampler(
    mut binding: AdaptorBinding,
    mut aggregator: SeriesAggregator,
    subscribers: Arc<Subscribers>,
    display: Arc<Mutex<DisplayState>>,
) -> impl FnMut() + Send + 'static {
    move || {
        let reading = binding.read();
        let state = aggregator.tick(reading);
        debug!(
            sent = reading.sent_mbps,
            received = reading.received_mbps,
            scale = state.scale_mbps,
            "tick"
        );

        *display.lock() = state.clone();
        subscribers.publish(&MonitorEvent::Display(state));
    }
}
