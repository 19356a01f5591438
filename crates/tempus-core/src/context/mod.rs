//! Scoped context store for the timing of the current request.
//!
//! A [`Timing`] handle bound with [`run`] is ambient for every poll of the
//! wrapped future, including the futures it awaits, joins or selects.
//! Task-local values do not cross [`tokio::spawn`] by themselves, so
//! [`spawn`] and [`propagate`] carry the current handle into new tasks.
//!
//! # Examples
//!
//! ```rust,ignore
//! use tempus_core::{context, timing::Timing};
//!
//! let timing = Timing::new();
//! context::run(timing.clone(), async {
//!     context::timing().set_dur("db", 12.0);
//! })
//! .await;
//! assert_eq!(timing.header_value(), "db;dur=12");
//! ```

use crate::timing::Timing;
use futures::future::Either;
use std::{
    future::Future,
    sync::atomic::{AtomicBool, Ordering::Relaxed},
};
use tokio::task::{JoinHandle, futures::TaskLocalFuture};

tokio::task_local! {
    /// Timing handle of the current request.
    static CURRENT_TIMING: Timing;
}

/// Runs the future with the timing handle as the ambient scope.
#[inline]
pub fn run<F: Future>(timing: Timing, future: F) -> TaskLocalFuture<Timing, F> {
    CURRENT_TIMING.scope(timing, future)
}

/// Runs the closure with the timing handle as the ambient scope.
#[inline]
pub fn run_sync<T>(timing: Timing, f: impl FnOnce() -> T) -> T {
    CURRENT_TIMING.sync_scope(timing, f)
}

/// Returns the timing handle of the current request if it exists.
#[inline]
pub fn current() -> Option<Timing> {
    CURRENT_TIMING.try_with(Timing::clone).ok()
}

/// Returns the timing handle of the current request.
///
/// Outside of any request a detached empty handle is returned instead,
/// and a warning is emitted the first time it happens.
pub fn timing() -> Timing {
    current().unwrap_or_else(|| {
        if !MISSING_SCOPE_WARNED.swap(true, Relaxed) {
            tracing::warn!(
                "server timing scope is not available outside of a request; \
                    wrap the request handler to record timing entries"
            );
        }
        Timing::new()
    })
}

/// Binds the current timing handle, if any, to the future so that it
/// remains ambient when the future is polled from another task.
pub fn propagate<F: Future>(future: F) -> Either<TaskLocalFuture<Timing, F>, F> {
    match current() {
        Some(timing) => Either::Left(run(timing, future)),
        None => Either::Right(future),
    }
}

/// Spawns a new task which inherits the timing handle of the current request.
#[inline]
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::spawn(propagate(future))
}

/// A flag to emit the missing scope warning only once.
static MISSING_SCOPE_WARNED: AtomicBool = AtomicBool::new(false);
