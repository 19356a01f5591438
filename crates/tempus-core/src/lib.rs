//! Core types and traits for [`tempus`].
//!
//! Application code records named timing entries through [`timing()`](context::timing)
//! anywhere in the call tree of a request. The entries are serialized into
//! the `Server-Timing` header right before the response head is written.
//!
//! [`tempus`]: https://github.com/tempus-rs/tempus

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod build;
pub mod config;
pub mod context;
pub mod error;
pub mod extension;
pub mod header;
pub mod interceptor;
pub mod timing;

#[cfg(feature = "tracing-subscriber")]
pub mod application;

/// An allocation-optimized string.
pub type SharedString = std::borrow::Cow<'static, str>;

/// An owned dynamically typed future.
pub type BoxFuture<'a, T = ()> =
    std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;
