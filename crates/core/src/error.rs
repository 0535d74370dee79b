use thiserror::Error;

/// Top-level error type shared by every netmon crate.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// No counter source matched the configured adaptor selector.
    #[error("adaptor not found: {0}")]
    AdaptorNotFound(String),

    /// The session was stopped while the adaptor was still being resolved.
    #[error("adaptor resolution cancelled")]
    CancelledDuringResolution,

    /// A render sink failed while consuming a tick's display state.
    #[error("tick consumption error: {0}")]
    TickConsumption(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("system error: {0}")]
    System(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl MonitorError {
    /// `true` for failures that should be surfaced to the user.
    ///
    /// Cancellation is an expected outcome of stopping early and is not.
    #[must_use]
    pub fn is_reportable(&self) -> bool {
        !matches!(self, Self::CancelledDuringResolution)
    }
}

pub type Result<T, E = MonitorError> = std::result::Result<T, E>;
