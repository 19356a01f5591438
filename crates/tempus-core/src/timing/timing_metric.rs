use super::TimingEntry;
use std::fmt::{self, Write};

/// A metric of the performance timing, formatted as a `Server-Timing` token.
///
/// The token has the form `name;dur=<duration>;desc="<description>"`.
/// Absent parameters are omitted, and non-finite durations are treated as absent.
#[derive(Debug, Clone, Copy)]
pub struct TimingMetric<'a> {
    /// Metric name.
    name: &'a str,
    /// Timing entry.
    entry: &'a TimingEntry,
}

impl<'a> TimingMetric<'a> {
    /// Creates a new instance.
    #[inline]
    pub fn new(name: &'a str, entry: &'a TimingEntry) -> Self {
        Self { name, entry }
    }

    /// Returns the name.
    #[inline]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Returns the timing entry.
    #[inline]
    pub fn entry(&self) -> &'a TimingEntry {
        self.entry
    }
}

impl fmt::Display for TimingMetric<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name)?;
        if let Some(dur) = self.entry.dur().filter(|dur| dur.is_finite()) {
            let duration_millis = format!("{dur:.3}");
            let duration = duration_millis
                .trim_end_matches('0')
                .trim_end_matches('.');
            write!(f, ";dur={duration}")?;
        }
        if let Some(desc) = self.entry.desc() {
            f.write_str(";desc=\"")?;
            for c in desc.chars() {
                if matches!(c, '"' | '\\') {
                    f.write_char('\\')?;
                }
                f.write_char(c)?;
            }
            f.write_char('"')?;
        }
        Ok(())
    }
}
