use super::TimingWriter;
use crate::{BoxFuture, context, error::Error, timing::Timing};
use std::future::Future;
use url::Url;

/// A handler of a single request which writes its response through `W`.
pub trait RequestHandler<Req, W>: Send + Sync {
    /// Handles the request with the response writer and the optional parsed URL.
    /// The returned future completes when the request has been processed.
    fn handle(
        &self,
        req: Req,
        res: W,
        parsed_url: Option<Url>,
    ) -> BoxFuture<'_, Result<(), Error>>;
}

impl<Req, W, F, Fut> RequestHandler<Req, W> for F
where
    F: Fn(Req, W, Option<Url>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), Error>> + Send + 'static,
{
    #[inline]
    fn handle(
        &self,
        req: Req,
        res: W,
        parsed_url: Option<Url>,
    ) -> BoxFuture<'_, Result<(), Error>> {
        Box::pin(self(req, res, parsed_url))
    }
}

/// A request handler wrapped by [`with_server_timing`].
///
/// It accepts the same arguments as the inner handler, except that the
/// response writer is decorated with a [`TimingWriter`] before delegating.
#[derive(Debug, Clone)]
pub struct ServerTimingHandler<H> {
    /// Inner handler.
    handler: H,
}

impl<H> ServerTimingHandler<H> {
    /// Returns a reference to the inner handler.
    #[inline]
    pub fn get_ref(&self) -> &H {
        &self.handler
    }

    /// Consumes `self` and returns the inner handler.
    #[inline]
    pub fn into_inner(self) -> H {
        self.handler
    }
}

impl<Req, W, H> RequestHandler<Req, W> for ServerTimingHandler<H>
where
    H: RequestHandler<Req, TimingWriter<W>>,
{
    fn handle(
        &self,
        req: Req,
        res: W,
        parsed_url: Option<Url>,
    ) -> BoxFuture<'_, Result<(), Error>> {
        let timing = Timing::new();
        let res = TimingWriter::new(res, timing.clone());
        let future = context::run_sync(timing.clone(), || {
            self.handler.handle(req, res, parsed_url)
        });
        Box::pin(context::run(timing, future))
    }
}

/// Wraps the request handler so that each request is processed inside
/// a fresh timing scope and its response carries a `Server-Timing` header.
#[inline]
pub fn with_server_timing<H>(handler: H) -> ServerTimingHandler<H> {
    ServerTimingHandler { handler }
}
