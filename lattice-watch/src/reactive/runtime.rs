//! Reactive Runtime
//!
//! The runtime connects signals to the computations that read them and
//! decides when those computations re-run.
//!
//! # How It Works
//!
//! 1. A computation registers with the runtime and receives a handle.
//!
//! 2. While the computation runs, every signal it reads records an edge
//!    `signal -> subscriber` in the registry.
//!
//! 3. When a signal changes, its subscribers are appended to the pending
//!    queue of the current thread. Outside a [`batch`] the queue is flushed
//!    immediately; inside one, it is flushed when the outermost batch ends.
//!
//! 4. A flush drains the queue round by round. A computation that is
//!    disposed by the time its turn comes is skipped, so `dispose()` also
//!    cancels a run that is already pending.
//!
//! # Threading
//!
//! The dependency registry is global (a `DashMap`), the pending queue is
//! thread-local. Computations re-run synchronously on the thread that made
//! the change.

use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock, Weak};

use dashmap::DashMap;
use indexmap::IndexSet;
use tracing::{trace, warn};

use super::context::ReactiveContext;
use super::subscriber::SubscriberId;

/// Upper bound on flush rounds before the runtime gives up on settling.
///
/// A computation that keeps re-triggering itself would otherwise spin
/// forever.
pub const MAX_FLUSH_ROUNDS: usize = 1_000;

/// A computation the runtime can re-run.
pub trait Reactive: Send + Sync {
    /// Get the subscriber ID for this computation.
    fn subscriber_id(&self) -> SubscriberId;

    /// Whether the computation has been stopped for good.
    fn is_disposed(&self) -> bool;

    /// Re-run the computation.
    fn run(&self);
}

/// Handle to a registered computation.
///
/// Dropping this handle unregisters the computation from the runtime.
#[derive(Debug)]
pub struct ReactiveHandle {
    subscriber_id: SubscriberId,
}

impl ReactiveHandle {
    /// The subscriber this handle keeps registered.
    pub fn subscriber_id(&self) -> SubscriberId {
        self.subscriber_id
    }
}

impl Drop for ReactiveHandle {
    fn drop(&mut self) {
        Runtime::unregister(self.subscriber_id);
    }
}

/// The global reactive runtime.
pub struct Runtime;

// Subscriber ID -> computation. Weak so the registry never keeps a
// computation alive on its own.
static REGISTRY: OnceLock<DashMap<SubscriberId, Weak<dyn Reactive>>> = OnceLock::new();
// Signal ID -> subscribers, in the order they first read the signal.
static SIGNAL_SUBSCRIBERS: OnceLock<DashMap<u64, IndexSet<SubscriberId>>> = OnceLock::new();
// Subscriber ID -> signals, the reverse index used to clear dependencies.
static SUBSCRIBER_SIGNALS: OnceLock<DashMap<SubscriberId, HashSet<u64>>> = OnceLock::new();

fn registry() -> &'static DashMap<SubscriberId, Weak<dyn Reactive>> {
    REGISTRY.get_or_init(DashMap::new)
}

fn signal_subscribers() -> &'static DashMap<u64, IndexSet<SubscriberId>> {
    SIGNAL_SUBSCRIBERS.get_or_init(DashMap::new)
}

fn subscriber_signals() -> &'static DashMap<SubscriberId, HashSet<u64>> {
    SUBSCRIBER_SIGNALS.get_or_init(DashMap::new)
}

#[derive(Default)]
struct SchedulerState {
    pending: IndexSet<SubscriberId>,
    batch_depth: usize,
    flushing: bool,
}

thread_local! {
    static SCHEDULER: RefCell<SchedulerState> = RefCell::new(SchedulerState::default());
}

/// Leaves the batch (or flush) on drop so a panic cannot wedge the thread.
struct BatchGuard;

impl Drop for BatchGuard {
    fn drop(&mut self) {
        SCHEDULER.with(|s| s.borrow_mut().batch_depth -= 1);
    }
}

struct FlushGuard;

impl Drop for FlushGuard {
    fn drop(&mut self) {
        SCHEDULER.with(|s| s.borrow_mut().flushing = false);
    }
}

impl Runtime {
    /// Register a computation with the runtime.
    ///
    /// Returns a handle that unregisters the computation when dropped.
    pub fn register(reactive: Arc<dyn Reactive>) -> ReactiveHandle {
        let id = reactive.subscriber_id();
        registry().insert(id, Arc::downgrade(&reactive));
        trace!(subscriber = %id, "registered computation");

        ReactiveHandle { subscriber_id: id }
    }

    /// Unregister a computation and drop all of its dependency edges.
    pub fn unregister(id: SubscriberId) {
        registry().remove(&id);
        Self::clear_dependencies(id);
        // Handles can outlive the thread-local during thread teardown.
        let _ = SCHEDULER.try_with(|s| {
            s.borrow_mut().pending.shift_remove(&id);
        });
        trace!(subscriber = %id, "unregistered computation");
    }

    /// Check whether a subscriber is still registered.
    pub fn is_registered(id: SubscriberId) -> bool {
        registry().contains_key(&id)
    }

    /// Record that a subscriber depends on a signal.
    ///
    /// Called by signals when they are read inside a computation.
    pub fn add_dependency(signal_id: u64, subscriber_id: SubscriberId) {
        signal_subscribers()
            .entry(signal_id)
            .or_default()
            .insert(subscriber_id);

        subscriber_signals()
            .entry(subscriber_id)
            .or_default()
            .insert(signal_id);
    }

    /// Remove all dependencies for a subscriber.
    ///
    /// Called before re-running a computation so that only the reads of the
    /// new run count.
    pub fn clear_dependencies(subscriber_id: SubscriberId) {
        let Some((_, signals)) = subscriber_signals().remove(&subscriber_id) else {
            return;
        };

        for signal_id in signals {
            if let Some(mut subs) = signal_subscribers().get_mut(&signal_id) {
                subs.shift_remove(&subscriber_id);
            }
            signal_subscribers().remove_if(&signal_id, |_, subs| subs.is_empty());
        }
    }

    /// Number of subscribers currently depending on a signal.
    pub fn subscriber_count(signal_id: u64) -> usize {
        signal_subscribers()
            .get(&signal_id)
            .map(|subs| subs.len())
            .unwrap_or(0)
    }

    /// Number of signals a subscriber currently depends on.
    pub fn dependency_count(subscriber_id: SubscriberId) -> usize {
        subscriber_signals()
            .get(&subscriber_id)
            .map(|signals| signals.len())
            .unwrap_or(0)
    }

    /// Notify the runtime that a signal changed.
    ///
    /// Queues every dependent computation and flushes unless a batch or a
    /// flush is already in progress on this thread.
    pub fn notify_signal_change(signal_id: u64) {
        let subscriber_ids: Vec<SubscriberId> = signal_subscribers()
            .get(&signal_id)
            .map(|subs| subs.iter().copied().collect())
            .unwrap_or_default();

        if subscriber_ids.is_empty() {
            return;
        }

        let should_flush = SCHEDULER.with(|s| {
            let mut state = s.borrow_mut();
            state.pending.extend(subscriber_ids);
            state.batch_depth == 0 && !state.flushing
        });

        if should_flush {
            Self::flush();
        }
    }

    /// Run every pending computation until the queue settles.
    ///
    /// Calling this while a flush is already running on the same thread is a
    /// no-op; the outer flush picks up whatever was queued.
    pub fn flush() {
        let already_flushing = SCHEDULER.with(|s| {
            let mut state = s.borrow_mut();
            std::mem::replace(&mut state.flushing, true)
        });
        if already_flushing {
            return;
        }
        let _guard = FlushGuard;

        for round in 1..=MAX_FLUSH_ROUNDS {
            let queue = SCHEDULER.with(|s| std::mem::take(&mut s.borrow_mut().pending));
            if queue.is_empty() {
                return;
            }
            trace!(round, queued = queue.len(), "flushing computations");

            for id in queue {
                let reactive = registry().get(&id).and_then(|entry| entry.value().upgrade());
                match reactive {
                    Some(reactive) if !reactive.is_disposed() => reactive.run(),
                    _ => trace!(subscriber = %id, "skipping stopped computation"),
                }
            }
        }

        let dropped = SCHEDULER.with(|s| {
            let mut state = s.borrow_mut();
            let dropped = state.pending.len();
            state.pending.clear();
            dropped
        });
        warn!(
            rounds = MAX_FLUSH_ROUNDS,
            dropped, "flush did not settle; dropping pending computations"
        );
    }

    /// Run `f` with flushing deferred until the outermost batch ends.
    pub fn batch<R>(f: impl FnOnce() -> R) -> R {
        SCHEDULER.with(|s| s.borrow_mut().batch_depth += 1);
        let result = {
            let _guard = BatchGuard;
            f()
        };

        let should_flush = SCHEDULER.with(|s| {
            let state = s.borrow();
            state.batch_depth == 0 && !state.flushing && !state.pending.is_empty()
        });
        if should_flush {
            Self::flush();
        }

        result
    }

    /// Run `f` without recording any dependency for the current computation.
    pub fn untrack<R>(f: impl FnOnce() -> R) -> R {
        let _ctx = ReactiveContext::untracked();
        f()
    }

    /// Get the current subscriber being tracked, if any.
    pub fn current_subscriber() -> Option<SubscriberId> {
        ReactiveContext::current_subscriber()
    }

    /// Check if reads on this thread are currently tracked.
    pub fn is_tracking() -> bool {
        ReactiveContext::is_active()
    }
}

/// Shorthand for [`Runtime::batch`].
pub fn batch<R>(f: impl FnOnce() -> R) -> R {
    Runtime::batch(f)
}

/// Shorthand for [`Runtime::untrack`].
pub fn untrack<R>(f: impl FnOnce() -> R) -> R {
    Runtime::untrack(f)
}
