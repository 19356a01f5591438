use super::Timing;
use crate::SharedString;
use std::time::{Duration, Instant};

/// A stopwatch started by [`Timing::start`].
///
/// The elapsed time is recorded once, either by [`finish`](Self::finish) or on drop.
#[derive(Debug)]
#[must_use = "the elapsed time is recorded as soon as the guard is dropped"]
pub struct TimingGuard {
    /// Timing handle.
    timing: Timing,
    /// Entry name. It is taken once the duration has been recorded.
    name: Option<SharedString>,
    /// Optional description.
    desc: Option<SharedString>,
    /// Start time.
    start_time: Instant,
}

impl TimingGuard {
    /// Creates a new instance.
    #[inline]
    pub(super) fn new(timing: Timing, name: SharedString) -> Self {
        Self {
            timing,
            name: Some(name),
            desc: None,
            start_time: Instant::now(),
        }
    }

    /// Returns the guard with a description recorded alongside the duration.
    #[inline]
    pub fn with_desc(mut self, desc: impl Into<SharedString>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    /// Returns the time elapsed since the guard was started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Stops the stopwatch and records the elapsed time.
    #[inline]
    pub fn finish(mut self) -> Duration {
        self.record()
    }

    /// Records the elapsed time if it has not been recorded.
    fn record(&mut self) -> Duration {
        let duration = self.elapsed();
        if let Some(name) = self.name.take() {
            let desc = self.desc.take();
            self.timing.with_scope(|scope| {
                let entry = scope.entry(name);
                entry.set_duration(duration);
                if let Some(desc) = desc {
                    entry.set_desc(desc);
                }
            });
        }
        duration
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        self.record();
    }
}

#[cfg(test)]
mod tests {
    use crate::timing::Timing;

    #[test]
    fn it_records_elapsed_time_once() {
        let timing = Timing::new();
        let duration = timing.start("render").with_desc("template").finish();
        let entry = timing.get("render").unwrap_or_default();
        assert_eq!(entry.dur(), Some(duration.as_secs_f64() * 1000.0));
        assert_eq!(entry.desc(), Some("template"));

        {
            let _guard = timing.start("cache");
        }
        assert!(timing.get("cache").and_then(|entry| entry.dur()).is_some());
        assert_eq!(timing.len(), 2);
    }
}
