//! Integrations with [`axum`] for [`tempus`].
//!
//! [`tempus`]: https://github.com/tempus-rs/tempus

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod middleware;

pub use middleware::{
    ServerTimingLayer, ServerTimingService, server_timing_middleware,
    server_timing_middleware_with_config,
};
