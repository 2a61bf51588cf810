//! Lattice Watch
//!
//! This crate observes deep changes in a graph of reactive containers.
//! Given a root record, sequence or map, it discovers every reachable value
//! (fields, elements, entries and container sizes) and subscribes a
//! callback to them. It implements:
//!
//! - Reactive primitives (signals, effects, batched flushes)
//! - A capability model for observable nodes
//! - A traversal engine with four watch modes
//! - Per-owner watch sets with bulk disposal
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `reactive`: signals, effects and the runtime that re-runs effects
//! - `node`: values, capabilities, loci and child enumeration
//! - `watch`: watch registration, ignore sets, watch sets and traversal
//! - `watcher`: the consumer-facing entry points
//!
//! # Example
//!
//! ```rust,ignore
//! use lattice_watch::{IgnoreSet, Value, Watcher};
//!
//! let mut watcher = Watcher::new();
//!
//! // `person` is any Observable exposing the record capability
//! watcher.watch_shallow(
//!     move || Value::node(person.clone()),
//!     |locus, value| println!("{locus} = {value:?}"),
//!     IgnoreSet::new(),
//! )?;
//!
//! person.set("name", "Ann");
//! // prints: .name = Text("Ann")
//!
//! watcher.stop_all_watches();
//! ```

pub mod config;
pub mod error;
pub mod node;
pub mod reactive;
pub mod watch;
mod watcher;

pub use config::WatchConfig;
pub use error::{Result, WatchError};
pub use node::{classify, Key, Locus, NodeKind, NodeRef, Observable, Value};
pub use watch::{Callback, CallbackShape, Change, IgnoreSet, TraversalMode, Watch, WatchSet, WatchState};
pub use watcher::Watcher;
