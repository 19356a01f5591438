//! Application bootstrap for the tracing subscriber.

mod tracing_subscriber;

pub use tracing_subscriber::init_tracing;
