//! Type-erased errors with a chain of sources.

use crate::SharedString;
use std::{error, fmt};

mod source;

pub use source::Source;

/// An error type backed by an allocation-optimized string.
#[derive(Debug)]
pub struct Error {
    /// Error message.
    message: SharedString,
    /// Error source.
    source: Option<Box<Error>>,
}

impl Error {
    /// Creates a new instance with the supplied message.
    #[inline]
    pub fn new(message: impl Into<SharedString>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new instance with the supplied message and the error source.
    #[inline]
    pub fn with_source(message: impl Into<SharedString>, source: impl Into<Error>) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source.into())),
        }
    }

    /// Returns a new instance with the supplied message and `self` as the error source.
    #[inline]
    pub fn wrap(self, message: impl Into<SharedString>) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(self)),
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    /// Returns the source.
    #[inline]
    pub fn source(&self) -> Option<&Error> {
        self.source.as_deref()
    }

    /// Returns an iterator of the source errors contained by `self`.
    #[inline]
    pub fn sources(&self) -> Source<'_> {
        Source::new(self)
    }

    /// Returns the lowest level source of `self`.
    #[inline]
    pub fn root_source(&self) -> Option<&Error> {
        self.sources().last()
    }
}

impl<E: error::Error + 'static> From<E> for Error {
    #[inline]
    fn from(err: E) -> Self {
        Self {
            message: err.to_string().into(),
            source: err.source().map(|err| Box::new(Self::new(err.to_string()))),
        }
    }
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = &self.message;
        if let Some(source) = &self.source {
            write!(f, "{message}: {source}")
        } else {
            write!(f, "{message}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn it_chains_error_sources() {
        let err = Error::new("connection reset")
            .wrap("fail to write the response head")
            .wrap("fail to handle the request");
        assert_eq!(err.message(), "fail to handle the request");
        assert_eq!(err.sources().count(), 2);
        assert_eq!(
            err.root_source().map(|source| source.message()),
            Some("connection reset"),
        );
        assert_eq!(
            err.to_string(),
            "fail to handle the request: fail to write the response head: connection reset",
        );
    }
}
