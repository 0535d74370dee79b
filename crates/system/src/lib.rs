//! Host-side plumbing: the periodic scheduler and the `sysinfo`/sysfs backed
//! counter provider.

pub mod counters;
pub mod interfaces;
pub mod scheduler;

pub use counters::{Direction, SysinfoCounter, SystemProvider};
pub use interfaces::SysfsInterfaces;
pub use scheduler::{JobId, Scheduler};
