//! Watch Registrar
//!
//! A watch is one [`Effect`] seen from the outside: it runs its body once at
//! registration, re-runs whenever a signal read in its last run changes, and
//! can be stopped for good.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::reactive::Effect;

/// Lifecycle of a watch. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchState {
    Active,
    Stopped,
}

/// A live subscription bound to a zero-argument function.
///
/// Dropping the last handle to a watch also stops it, since the runtime
/// keeps only weak references to running computations.
#[derive(Debug)]
pub struct Watch {
    effect: Effect,
}

impl Watch {
    /// Stop the watch. Takes effect immediately, including for a re-run
    /// already queued in the current flush. Stopping twice is harmless.
    pub fn stop(&self) {
        if !self.effect.is_disposed() {
            trace!(watch = self.effect.id(), runs = self.effect.run_count(), "stopping watch");
            self.effect.dispose();
        }
    }

    pub fn state(&self) -> WatchState {
        if self.effect.is_disposed() {
            WatchState::Stopped
        } else {
            WatchState::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == WatchState::Active
    }

    /// How many times the body has run, registration included.
    pub fn run_count(&self) -> usize {
        self.effect.run_count()
    }

    /// How many signals the body read in its last run.
    pub fn dependency_count(&self) -> usize {
        self.effect.dependency_count()
    }
}

/// Wrap `body` into a watch. The body runs once before this returns.
pub fn register<F>(body: F) -> Watch
where
    F: Fn() + Send + Sync + 'static,
{
    let effect = Effect::new(body);
    trace!(
        watch = effect.id(),
        dependencies = effect.dependency_count(),
        "registered watch"
    );
    Watch { effect }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::{batch, Signal};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(signal: &Signal<i64>) -> (Watch, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let watch = register({
            let signal = signal.clone();
            let runs = runs.clone();
            move || {
                signal.get();
                runs.fetch_add(1, Ordering::SeqCst);
            }
        });
        (watch, runs)
    }

    #[test]
    fn runs_at_registration_and_on_change() {
        let signal = Signal::new(0);
        let (watch, runs) = counting(&signal);

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(watch.dependency_count(), 1);

        signal.set(1);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert_eq!(watch.run_count(), 2);
    }

    #[test]
    fn stop_is_terminal_and_idempotent() {
        let signal = Signal::new(0);
        let (watch, runs) = counting(&signal);

        assert_eq!(watch.state(), WatchState::Active);
        watch.stop();
        watch.stop();
        assert_eq!(watch.state(), WatchState::Stopped);

        signal.set(1);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stop_cancels_a_pending_run() {
        let signal = Signal::new(0);
        let (watch, runs) = counting(&signal);

        batch(|| {
            signal.set(1);
            watch.stop();
        });

        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
