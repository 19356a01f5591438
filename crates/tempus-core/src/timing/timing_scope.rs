use super::{TimingEntry, TimingMetric};
use crate::SharedString;
use smallvec::SmallVec;
use std::{fmt, time::Duration};

/// A mapping from entry names to timing entries for a single request.
///
/// Entries keep their insertion order. Updating an existing entry does not move it.
#[derive(Debug, Clone, Default)]
pub struct TimingScope {
    /// Named timing entries.
    entries: SmallVec<[(SharedString, TimingEntry); 4]>,
}

impl TimingScope {
    /// Creates a new instance.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    /// Returns the index of the entry with the name.
    #[inline]
    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key.as_ref() == name)
    }

    /// Inserts an entry. If an entry with the name already exists,
    /// it is replaced in place and the old value is returned.
    pub fn insert(
        &mut self,
        name: impl Into<SharedString>,
        entry: TimingEntry,
    ) -> Option<TimingEntry> {
        let name = name.into();
        if let Some(index) = self.position(&name) {
            Some(std::mem::replace(&mut self.entries[index].1, entry))
        } else {
            self.entries.push((name, entry));
            None
        }
    }

    /// Returns a mutable reference to the entry with the name,
    /// inserting an empty one if it does not exist.
    pub fn entry(&mut self, name: impl Into<SharedString>) -> &mut TimingEntry {
        let name = name.into();
        let index = match self.position(&name) {
            Some(index) => index,
            None => {
                self.entries.push((name, TimingEntry::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    /// Returns a reference to the entry with the name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&TimingEntry> {
        self.position(name).map(|index| &self.entries[index].1)
    }

    /// Returns a mutable reference to the entry with the name.
    #[inline]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut TimingEntry> {
        self.position(name).map(|index| &mut self.entries[index].1)
    }

    /// Removes the entry with the name.
    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<TimingEntry> {
        self.position(name)
            .map(|index| self.entries.remove(index).1)
    }

    /// Sets the duration in milliseconds for the entry with the name.
    #[inline]
    pub fn set_dur(&mut self, name: impl Into<SharedString>, dur: f64) {
        self.entry(name).set_dur(dur);
    }

    /// Sets the duration for the entry with the name.
    #[inline]
    pub fn set_duration(&mut self, name: impl Into<SharedString>, duration: Duration) {
        self.entry(name).set_duration(duration);
    }

    /// Sets the description for the entry with the name.
    #[inline]
    pub fn set_desc(&mut self, name: impl Into<SharedString>, desc: impl Into<SharedString>) {
        self.entry(name).set_desc(desc);
    }

    /// Records an entry with the optional duration and description.
    /// Fields that are `None` keep their previous values.
    pub fn record(
        &mut self,
        name: impl Into<SharedString>,
        dur: Option<f64>,
        desc: Option<SharedString>,
    ) {
        let entry = self.entry(name);
        if let Some(dur) = dur {
            entry.set_dur(dur);
        }
        if let Some(desc) = desc {
            entry.set_desc(desc);
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the scope contains no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator of the entries in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TimingEntry)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_ref(), entry))
    }

    /// Returns an iterator of the formattable metrics in insertion order.
    #[inline]
    pub fn metrics(&self) -> impl Iterator<Item = TimingMetric<'_>> {
        self.iter().map(|(name, entry)| TimingMetric::new(name, entry))
    }

    /// Returns the `Server-Timing` header value.
    #[inline]
    pub fn header_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TimingScope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let output = self
            .metrics()
            .map(|metric| metric.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{output}")
    }
}

#[cfg(test)]
mod tests {
    use super::TimingScope;
    use crate::timing::TimingEntry;

    #[test]
    fn it_preserves_insertion_order() {
        let mut scope = TimingScope::new();
        scope.set_dur("a", 1.0);
        scope.set_desc("b", "second");
        scope.set_dur("c", 3.5);
        scope.set_desc("a", "first");
        assert_eq!(
            scope.header_value(),
            r#"a;dur=1;desc="first", b;desc="second", c;dur=3.5"#,
        );

        let old_entry = scope.insert("b", TimingEntry::new().with_dur(2.0));
        assert_eq!(
            old_entry.as_ref().and_then(|entry| entry.desc()),
            Some("second"),
        );
        assert_eq!(
            scope.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            ["a", "b", "c"],
        );

        assert!(scope.remove("a").is_some());
        assert_eq!(scope.header_value(), "b;dur=2, c;dur=3.5");
    }

    #[test]
    fn it_records_partial_updates() {
        let mut scope = TimingScope::new();
        scope.record("db", Some(12.0), Some("query".into()));
        scope.record("db", None, None);
        assert_eq!(scope.len(), 1);
        assert_eq!(scope.header_value(), r#"db;dur=12;desc="query""#);

        scope.record("db", Some(15.0), None);
        assert_eq!(scope.get("db").and_then(|entry| entry.dur()), Some(15.0));
        assert_eq!(scope.get("db").and_then(|entry| entry.desc()), Some("query"));
    }

    #[test]
    fn it_formats_empty_scope() {
        let scope = TimingScope::new();
        assert!(scope.is_empty());
        assert_eq!(scope.header_value(), "");
    }
}
