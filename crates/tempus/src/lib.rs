//! Per-request `Server-Timing` instrumentation.
//!
//! Wrap a request handler with [`with_server_timing`], or add the
//! `ServerTimingLayer` to an axum router with the `axum` feature, then record
//! timing entries anywhere in the call tree of the request:
//!
//! ```rust,ignore
//! use tempus::prelude::*;
//!
//! async fn list_products() -> &'static str {
//!     let _guard = timing().start("db").with_desc("query");
//!     "products"
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod prelude;

#[doc(no_inline)]
pub use tempus_core::{
    build::{BuildConfig, with_server_timing_build},
    config::ServerTimingConfig,
    context::{current, spawn, timing},
    error::Error,
    interceptor::{HeaderWriter, RequestHandler, TimingWriter, with_server_timing},
    timing::{Timing, TimingEntry},
};

#[doc(no_inline)]
pub use tempus_core::{build, config, context, error, header, interceptor};

cfg_if::cfg_if! {
    if #[cfg(feature = "axum")] {
        #[doc(no_inline)]
        pub use tempus_axum::{
            ServerTimingLayer, ServerTimingService, server_timing_middleware,
            server_timing_middleware_with_config,
        };
    }
}

#[cfg(feature = "logger")]
#[doc(no_inline)]
pub use tempus_core::application::init_tracing;
