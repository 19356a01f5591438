//! Re-exports of common types in [`tempus_core`] and the integrations.

#[doc(no_inline)]
pub use tempus_core::{
    context::timing,
    header::ResponseHeaders,
    interceptor::{HeaderWriter, RequestHandler, TimingWriter, with_server_timing},
    timing::{Timing, TimingEntry, TimingGuard},
};

#[cfg(feature = "axum")]
#[doc(no_inline)]
pub use tempus_axum::ServerTimingLayer;
