use crate::{error::Error, header::ResponseHeaders, timing::Timing};
use http::StatusCode;

/// A writer of the response head.
pub trait HeaderWriter: Send {
    /// The result of writing the response head.
    type Output;

    /// Writes the status code and the optional headers of the response.
    fn write_head(
        &mut self,
        status_code: StatusCode,
        headers: Option<ResponseHeaders>,
    ) -> Result<Self::Output, Error>;
}

impl<W: HeaderWriter + ?Sized> HeaderWriter for Box<W> {
    type Output = W::Output;

    #[inline]
    fn write_head(
        &mut self,
        status_code: StatusCode,
        headers: Option<ResponseHeaders>,
    ) -> Result<Self::Output, Error> {
        (**self).write_head(status_code, headers)
    }
}

/// A header writer decorator which injects the `Server-Timing` header
/// into the first response head written through it.
///
/// Entries recorded after the first write are not reflected in the header.
/// Later writes are delegated to the inner writer unchanged.
#[derive(Debug)]
pub struct TimingWriter<W> {
    /// Inner writer.
    inner: W,
    /// Timing scope of the request.
    timing: Timing,
    /// A flag to indicate whether the response head has been written.
    flushed: bool,
}

impl<W> TimingWriter<W> {
    /// Creates a new instance.
    #[inline]
    pub fn new(inner: W, timing: Timing) -> Self {
        Self {
            inner,
            timing,
            flushed: false,
        }
    }

    /// Returns a reference to the timing handle.
    #[inline]
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Returns `true` if the response head has been written.
    #[inline]
    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    /// Returns a reference to the inner writer.
    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Returns a mutable reference to the inner writer.
    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Consumes `self` and returns the inner writer.
    #[inline]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: HeaderWriter> HeaderWriter for TimingWriter<W> {
    type Output = W::Output;

    fn write_head(
        &mut self,
        status_code: StatusCode,
        headers: Option<ResponseHeaders>,
    ) -> Result<Self::Output, Error> {
        if self.flushed {
            return self.inner.write_head(status_code, headers);
        }
        self.flushed = true;

        let server_timing = self.timing.header_value();
        tracing::debug!(
            status_code = status_code.as_u16(),
            server_timing,
            "inject the server timing into the response head"
        );
        let headers = ResponseHeaders::merge_server_timing(headers, &server_timing);
        self.inner.write_head(status_code, Some(headers))
    }
}
