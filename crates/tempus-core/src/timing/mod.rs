//! Per-request timing entries and their `Server-Timing` serialization.
//!
//! See [Server Timing](https://w3c.github.io/server-timing) for the header syntax.

mod timing_entry;
mod timing_guard;
mod timing_handle;
mod timing_metric;
mod timing_scope;

pub use timing_entry::TimingEntry;
pub use timing_guard::TimingGuard;
pub use timing_handle::Timing;
pub use timing_metric::TimingMetric;
pub use timing_scope::TimingScope;
