//! Watch Set
//!
//! All watches created on behalf of one owner. The owner can only add to the
//! set or stop everything in it; dropping the set stops whatever is left.

use tracing::debug;

use super::registrar::Watch;

#[derive(Debug, Default)]
pub struct WatchSet {
    watches: Vec<Watch>,
}

impl WatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, watch: Watch) {
        self.watches.push(watch);
    }

    /// Stop every watch and empty the set. Calling it on an empty set does
    /// nothing.
    pub fn stop_all(&mut self) {
        if self.watches.is_empty() {
            return;
        }

        let count = self.watches.len();
        for watch in self.watches.drain(..) {
            watch.stop();
        }
        debug!(count, "stopped all watches");
    }

    pub fn len(&self) -> usize {
        self.watches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    /// Number of watches still active. Equal to `len()` unless a watch was
    /// stopped from elsewhere.
    pub fn active_count(&self) -> usize {
        self.watches.iter().filter(|w| w.is_active()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Watch> {
        self.watches.iter()
    }
}

impl Extend<Watch> for WatchSet {
    fn extend<I: IntoIterator<Item = Watch>>(&mut self, iter: I) {
        self.watches.extend(iter);
    }
}

impl Drop for WatchSet {
    fn drop(&mut self) {
        self.stop_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Signal;
    use crate::watch::registrar::register;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn watch_signal(signal: &Signal<u8>, hits: &Arc<AtomicUsize>) -> Watch {
        let signal = signal.clone();
        let hits = hits.clone();
        register(move || {
            signal.get();
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn stop_all_stops_and_empties() {
        let signal = Signal::new(0);
        let hits = Arc::new(AtomicUsize::new(0));

        let mut set = WatchSet::new();
        set.append(watch_signal(&signal, &hits));
        set.append(watch_signal(&signal, &hits));
        assert_eq!(set.len(), 2);
        assert_eq!(set.active_count(), 2);
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        set.stop_all();
        assert!(set.is_empty());

        signal.set(1);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn stop_all_is_idempotent() {
        let mut never_used = WatchSet::new();
        never_used.stop_all();
        assert!(never_used.is_empty());

        let signal = Signal::new(0);
        let hits = Arc::new(AtomicUsize::new(0));
        let mut set = WatchSet::new();
        set.extend([watch_signal(&signal, &hits)]);

        set.stop_all();
        set.stop_all();
        assert!(set.is_empty());
    }

    #[test]
    fn dropping_the_set_stops_its_watches() {
        let signal = Signal::new(0);
        let hits = Arc::new(AtomicUsize::new(0));

        {
            let mut set = WatchSet::new();
            set.append(watch_signal(&signal, &hits));
        }

        signal.set(1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(signal.subscriber_count(), 0);
    }
}
