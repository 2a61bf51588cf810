//! Reactive Primitives
//!
//! This module implements the reactive substrate the watch engine runs on:
//! signals, effects, and the runtime that connects them.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A Signal is a container for mutable state. When a signal's value is read
//! within a running effect, the signal registers that effect as a dependent.
//! When the signal's value changes, all dependents are re-run.
//!
//! ## Effects
//!
//! An Effect is a side-effecting computation that runs once on creation and
//! again whenever one of its dependencies changes. Every watch is an effect.
//!
//! ## Batches
//!
//! Changes made inside [`batch`] are flushed together once the batch ends.
//! [`untrack`] reads values without creating dependencies.
//!
//! # Implementation Notes
//!
//! A thread-local context stack detects dependencies automatically: when a
//! signal is read, the computation on top of the stack becomes a dependent.

mod context;
mod effect;
mod runtime;
mod signal;
mod subscriber;

pub use context::ReactiveContext;
pub use effect::Effect;
pub use runtime::{batch, untrack, Reactive, ReactiveHandle, Runtime, MAX_FLUSH_ROUNDS};
pub use signal::Signal;
pub use subscriber::SubscriberId;
