use crate::SharedString;
use std::time::Duration;

/// A named measurement in the timing scope.
///
/// Both the duration and the description are optional and can be updated
/// independently of each other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingEntry {
    /// Duration in milliseconds.
    dur: Option<f64>,
    /// Optional description.
    desc: Option<SharedString>,
}

impl TimingEntry {
    /// Creates a new instance without a duration or a description.
    #[inline]
    pub fn new() -> Self {
        Self {
            dur: None,
            desc: None,
        }
    }

    /// Returns the entry with the duration in milliseconds.
    #[inline]
    pub fn with_dur(mut self, dur: f64) -> Self {
        self.dur = Some(dur);
        self
    }

    /// Returns the entry with the description.
    #[inline]
    pub fn with_desc(mut self, desc: impl Into<SharedString>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    /// Sets the duration in milliseconds.
    #[inline]
    pub fn set_dur(&mut self, dur: f64) {
        self.dur = Some(dur);
    }

    /// Sets the duration from a [`Duration`], converted to milliseconds.
    #[inline]
    pub fn set_duration(&mut self, duration: Duration) {
        self.dur = Some(duration.as_secs_f64() * 1000.0);
    }

    /// Sets the description.
    #[inline]
    pub fn set_desc(&mut self, desc: impl Into<SharedString>) {
        self.desc = Some(desc.into());
    }

    /// Clears the duration.
    #[inline]
    pub fn clear_dur(&mut self) {
        self.dur = None;
    }

    /// Clears the description.
    #[inline]
    pub fn clear_desc(&mut self) {
        self.desc = None;
    }

    /// Returns the duration in milliseconds.
    #[inline]
    pub fn dur(&self) -> Option<f64> {
        self.dur
    }

    /// Returns the description.
    #[inline]
    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }

    /// Returns `true` if neither the duration nor the description has been set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dur.is_none() && self.desc.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::TimingEntry;
    use std::time::Duration;

    #[test]
    fn it_updates_fields_independently() {
        let mut entry = TimingEntry::new();
        assert!(entry.is_empty());

        entry.set_desc("query");
        assert_eq!(entry.dur(), None);
        assert_eq!(entry.desc(), Some("query"));

        entry.set_duration(Duration::from_micros(2500));
        assert_eq!(entry.dur(), Some(2.5));
        assert_eq!(entry.desc(), Some("query"));

        entry.clear_desc();
        assert_eq!(entry, TimingEntry::new().with_dur(2.5));
    }
}
