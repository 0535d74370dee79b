use crate::{event::MonitorEvent, error::Result};

/// Receiver of session notifications, e.g. a chart widget or a terminal view.
///
/// `notify` is called on the sampling thread. Sinks that need a particular
/// execution context (a UI thread, an async task) are responsible for
/// forwarding the event there themselves.
pub trait RenderSink: Send + Sync {
    /// Consume one event. Returned errors are logged by the session and never
    /// interrupt sampling.
    fn notify(&self, event: &MonitorEvent) -> Result<()>;
}

impl<F> RenderSink for F
where
    F: Fn(&MonitorEvent) -> Result<()> + Send + Sync,
{
    fn notify(&self, event: &MonitorEvent) -> Result<()> {
        self(event)
    }
}
