//! Reactive Context
//!
//! The reactive context tracks which computation is currently running.
//! When a signal is read, the context tells it which subscriber to record
//! as a dependent.
//!
//! # Implementation
//!
//! A thread-local stack holds one entry per running computation. Entering a
//! computation pushes an entry; dropping the returned guard pops it. An
//! untracked frame (see [`ReactiveContext::untracked`]) pushes an entry with
//! no subscriber, which hides every outer computation from reads made while
//! it is active.

use std::cell::RefCell;

use super::SubscriberId;

thread_local! {
    static CONTEXT_STACK: RefCell<Vec<ContextEntry>> = const { RefCell::new(Vec::new()) };
}

/// An entry in the reactive context stack.
#[derive(Debug, Clone)]
struct ContextEntry {
    /// The running computation, or `None` for an untracked frame.
    subscriber_id: Option<SubscriberId>,
    /// Signal IDs read while this entry was on top of the stack.
    dependencies: Vec<u64>,
}

/// Guard that pops the context when dropped.
///
/// Popping on drop keeps the stack balanced even when a computation panics.
pub struct ReactiveContext {
    subscriber_id: Option<SubscriberId>,
}

impl ReactiveContext {
    /// Enter a new reactive context for the given subscriber.
    ///
    /// While the returned guard is alive, signals read on this thread
    /// register `subscriber_id` as a dependent.
    pub fn enter(subscriber_id: SubscriberId) -> Self {
        Self::push(Some(subscriber_id))
    }

    /// Enter an untracked frame.
    ///
    /// Reads made while the guard is alive record no dependency, even if a
    /// computation is running further down the stack.
    pub fn untracked() -> Self {
        Self::push(None)
    }

    fn push(subscriber_id: Option<SubscriberId>) -> Self {
        CONTEXT_STACK.with(|stack| {
            stack.borrow_mut().push(ContextEntry {
                subscriber_id,
                dependencies: Vec::new(),
            });
        });

        Self { subscriber_id }
    }

    /// Check if reads on this thread are currently tracked.
    pub fn is_active() -> bool {
        Self::current_subscriber().is_some()
    }

    /// Get the subscriber that a read would be attributed to, if any.
    pub fn current_subscriber() -> Option<SubscriberId> {
        CONTEXT_STACK.with(|stack| {
            stack
                .borrow()
                .last()
                .and_then(|entry| entry.subscriber_id)
        })
    }

    /// Record a dependency on the given signal in the top entry.
    pub fn track_dependency(signal_id: u64) {
        CONTEXT_STACK.with(|stack| {
            if let Some(entry) = stack.borrow_mut().last_mut() {
                if entry.subscriber_id.is_some() {
                    entry.dependencies.push(signal_id);
                }
            }
        });
    }

    /// Get the dependencies collected in the top entry.
    pub fn get_dependencies() -> Vec<u64> {
        CONTEXT_STACK.with(|stack| {
            stack
                .borrow()
                .last()
                .map(|entry| entry.dependencies.clone())
                .unwrap_or_default()
        })
    }
}

impl Drop for ReactiveContext {
    fn drop(&mut self) {
        CONTEXT_STACK.with(|stack| {
            let popped = stack.borrow_mut().pop();

            if let Some(entry) = popped {
                debug_assert_eq!(
                    entry.subscriber_id, self.subscriber_id,
                    "ReactiveContext mismatch: expected {:?}, got {:?}",
                    self.subscriber_id, entry.subscriber_id
                );
            }
        });
    }
}
