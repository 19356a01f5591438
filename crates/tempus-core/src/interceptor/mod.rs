//! Response interceptor which injects the `Server-Timing` header.
//!
//! [`with_server_timing`] wraps a [`RequestHandler`] so that every request
//! gets a fresh timing scope, and the response writer is decorated with a
//! [`TimingWriter`] which serializes the scope on the first head write.
//!
//! # Examples
//!
//! ```rust,ignore
//! use tempus_core::{
//!     context,
//!     interceptor::{HeaderWriter, RequestHandler, TimingWriter, with_server_timing},
//! };
//!
//! let handler = with_server_timing(|req: Request, mut res: TimingWriter<Writer>, _url| async move {
//!     context::timing().set_dur("db", 12.0);
//!     res.write_head(StatusCode::OK, None)?;
//!     Ok(())
//! });
//! handler.handle(req, writer, None).await?;
//! ```

mod request_handler;
mod timing_writer;

pub use request_handler::{RequestHandler, ServerTimingHandler, with_server_timing};
pub use timing_writer::{HeaderWriter, TimingWriter};
