//! Watches
//!
//! Turning a graph of observable nodes into live subscriptions.
//!
//! # Modes
//!
//! - `Leaf`: one watch around a caller-supplied read.
//! - `Shallow`: one watch per immediate child of the root.
//! - `DeepSilent`: one watch whose body reads the whole subtree. Any change
//!   re-runs it and the callback receives the root.
//! - `DeepDetailed`: one watch per reachable leaf plus one per sequence or
//!   map size. Each reports the [`Change`] it saw.
//!
//! Within a container, the size watch is always registered before the
//! element watches.

mod filter;
mod registrar;
mod set;
mod traversal;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WatchError};
use crate::node::{Locus, NodeRef, Value};

pub use filter::IgnoreSet;
pub use registrar::{register, Watch, WatchState};
pub use set::WatchSet;
pub(crate) use traversal::Traversal;

/// How much of the graph a registration covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalMode {
    Leaf,
    Shallow,
    DeepSilent,
    DeepDetailed,
}

impl TraversalMode {
    /// Check that a callback of `shape` can be used with this mode.
    pub fn validate(self, shape: CallbackShape) -> Result<()> {
        use CallbackShape as S;
        use TraversalMode as M;

        match (self, shape) {
            (M::Leaf | M::DeepSilent, S::None | S::Value)
            | (M::Shallow, S::Entry | S::Change)
            | (M::DeepDetailed, S::Change) => Ok(()),
            (M::Shallow | M::DeepDetailed, S::None) => {
                Err(WatchError::MissingCallback { mode: self })
            }
            (mode, shape) => Err(WatchError::UnsupportedCallbackShape { mode, shape }),
        }
    }

    /// Whether the root must be a record, sequence or map.
    pub fn needs_container_root(self) -> bool {
        !matches!(self, TraversalMode::Leaf)
    }
}

impl fmt::Display for TraversalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TraversalMode::Leaf => "leaf",
            TraversalMode::Shallow => "shallow",
            TraversalMode::DeepSilent => "deep-silent",
            TraversalMode::DeepDetailed => "deep-detailed",
        })
    }
}

/// One observed change: which child of which container now holds what.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub parent: NodeRef,
    pub locus: Locus,
    pub value: Value,
}

/// The arguments a callback accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackShape {
    /// No callback at all.
    None,
    /// `(value)`: a leaf value or the root.
    Value,
    /// `(locus, value)`.
    Entry,
    /// `(parent, locus, value)`.
    Change,
}

impl fmt::Display for CallbackShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CallbackShape::None => "missing",
            CallbackShape::Value => "value",
            CallbackShape::Entry => "entry",
            CallbackShape::Change => "change",
        })
    }
}

pub type ValueFn = dyn Fn(&Value) + Send + Sync;
pub type EntryFn = dyn Fn(&Locus, &Value) + Send + Sync;
pub type ChangeFn = dyn Fn(&Change) + Send + Sync;

/// A callback of any supported shape.
#[derive(Clone, Default)]
pub enum Callback {
    #[default]
    None,
    Value(Arc<ValueFn>),
    Entry(Arc<EntryFn>),
    Change(Arc<ChangeFn>),
}

impl Callback {
    pub fn value(f: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        Callback::Value(Arc::new(f))
    }

    pub fn entry(f: impl Fn(&Locus, &Value) + Send + Sync + 'static) -> Self {
        Callback::Entry(Arc::new(f))
    }

    pub fn change(f: impl Fn(&Change) + Send + Sync + 'static) -> Self {
        Callback::Change(Arc::new(f))
    }

    pub fn shape(&self) -> CallbackShape {
        match self {
            Callback::None => CallbackShape::None,
            Callback::Value(_) => CallbackShape::Value,
            Callback::Entry(_) => CallbackShape::Entry,
            Callback::Change(_) => CallbackShape::Change,
        }
    }

    /// Report a value that has no locus: a leaf read or a silent root.
    pub(crate) fn emit_value(&self, value: &Value) {
        if let Callback::Value(f) = self {
            f(value);
        }
    }

    /// Report the value at `parent[locus]`.
    pub(crate) fn emit_child(&self, parent: &NodeRef, locus: &Locus, value: &Value) {
        match self {
            Callback::Entry(f) => f(locus, value),
            Callback::Change(f) => f(&Change {
                parent: parent.clone(),
                locus: locus.clone(),
                value: value.clone(),
            }),
            Callback::Value(f) => f(value),
            Callback::None => {}
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({})", self.shape())
    }
}
