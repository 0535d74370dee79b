//! Throughput sampling core: adaptor resolution, the sliding-window
//! aggregator, and the session that ties them to the scheduler.

pub mod aggregator;
pub mod resolver;
pub mod session;
pub mod subscribers;

#[cfg(test)]
mod testing;

pub use aggregator::{select_tier, SeriesAggregator, SCALE_TIERS};
pub use resolver::{normalize_adaptor_name, resolve, AdaptorBinding};
pub use session::MonitorSession;
pub use subscribers::{SubscriptionId, Subscribers};
