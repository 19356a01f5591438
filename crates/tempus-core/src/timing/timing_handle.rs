use super::{TimingEntry, TimingGuard, TimingScope};
use crate::SharedString;
use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};

/// A shared handle to the timing scope of a request.
///
/// Cloning the handle is cheap and every clone refers to the same scope.
/// A handle obtained outside of any request is detached: writes to it are
/// accepted but never emitted.
#[derive(Debug, Clone, Default)]
pub struct Timing {
    /// Shared timing scope.
    scope: Arc<Mutex<TimingScope>>,
}

impl Timing {
    /// Creates a new instance with an empty scope.
    #[inline]
    pub fn new() -> Self {
        Self {
            scope: Arc::new(Mutex::new(TimingScope::new())),
        }
    }

    /// Calls the closure with a mutable reference to the scope.
    ///
    /// The scope is locked for the duration of the call, so the closure
    /// should not await or call back into the same handle.
    #[inline]
    pub fn with_scope<T>(&self, f: impl FnOnce(&mut TimingScope) -> T) -> T {
        f(&mut *self.scope.lock())
    }

    /// Sets the duration in milliseconds for the entry with the name.
    #[inline]
    pub fn set_dur(&self, name: impl Into<SharedString>, dur: f64) {
        self.scope.lock().set_dur(name, dur);
    }

    /// Sets the duration for the entry with the name.
    #[inline]
    pub fn set_duration(&self, name: impl Into<SharedString>, duration: Duration) {
        self.scope.lock().set_duration(name, duration);
    }

    /// Sets the description for the entry with the name.
    #[inline]
    pub fn set_desc(&self, name: impl Into<SharedString>, desc: impl Into<SharedString>) {
        self.scope.lock().set_desc(name, desc);
    }

    /// Records an entry with the optional duration and description.
    #[inline]
    pub fn record(
        &self,
        name: impl Into<SharedString>,
        dur: Option<f64>,
        desc: Option<SharedString>,
    ) {
        self.scope.lock().record(name, dur, desc);
    }

    /// Inserts an entry, replacing any existing one with the same name.
    #[inline]
    pub fn insert(
        &self,
        name: impl Into<SharedString>,
        entry: TimingEntry,
    ) -> Option<TimingEntry> {
        self.scope.lock().insert(name, entry)
    }

    /// Removes the entry with the name.
    #[inline]
    pub fn remove(&self, name: &str) -> Option<TimingEntry> {
        self.scope.lock().remove(name)
    }

    /// Returns a copy of the entry with the name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<TimingEntry> {
        self.scope.lock().get(name).cloned()
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.scope.lock().len()
    }

    /// Returns `true` if the scope contains no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scope.lock().is_empty()
    }

    /// Returns a copy of the current scope.
    #[inline]
    pub fn snapshot(&self) -> TimingScope {
        self.scope.lock().clone()
    }

    /// Returns the `Server-Timing` header value for the current entries.
    #[inline]
    pub fn header_value(&self) -> String {
        self.scope.lock().header_value()
    }

    /// Starts a stopwatch which records the elapsed time into the entry
    /// with the name when it is finished or dropped.
    #[inline]
    pub fn start(&self, name: impl Into<SharedString>) -> TimingGuard {
        TimingGuard::new(self.clone(), name.into())
    }

    /// Returns `true` if both handles refer to the same scope.
    #[inline]
    pub fn ptr_eq(&self, other: &Timing) -> bool {
        Arc::ptr_eq(&self.scope, &other.scope)
    }
}

#[cfg(test)]
mod tests {
    use super::Timing;

    #[test]
    fn it_shares_scope_between_clones() {
        let timing = Timing::new();
        let cloned = timing.clone();
        cloned.set_dur("db", 12.0);
        timing.set_desc("db", "query");
        assert!(timing.ptr_eq(&cloned));
        assert!(!timing.ptr_eq(&Timing::new()));
        assert_eq!(cloned.header_value(), r#"db;dur=12;desc="query""#);

        let snapshot = timing.snapshot();
        timing.set_dur("cache", 0.5);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(timing.len(), 2);
    }
}
