pub mod error;
pub mod event;
pub mod sink;
pub mod source;
pub mod state;

pub use error::{MonitorError, Result};
pub use event::MonitorEvent;
pub use sink::RenderSink;
pub use source::{CounterPair, CounterProvider, InterfaceInfo, InterfaceKind, OperStatus, RateCounter};
pub use state::{DisplayState, Sample, SeriesPoint, SessionState, StackedSeries, Throughput};
