//! Capability Classifier
//!
//! A node takes part in traversal through the capability it exposes, not
//! through its concrete type. Any `Observable` that answers `as_record`,
//! `as_sequence` or `as_map` is a container of that kind; everything else,
//! including every scalar [`Value`], is a leaf.
//!
//! Reads made through `get`, `len` and `element_at` are expected to be
//! tracked by the reactive runtime. `field_names` and `keys` are read at
//! setup time and need not be.

use std::sync::Arc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::value::{Key, Value};

/// Record capability: a fixed set of named fields.
pub trait RecordAccess {
    /// The record's field names, in declaration order.
    fn field_names(&self) -> IndexSet<Arc<str>>;

    /// Read one field.
    fn get(&self, field: &str) -> Option<Value>;
}

/// Sequence capability: index-addressed elements with an observable length.
pub trait SequenceAccess {
    fn len(&self) -> usize;

    /// Read the element at `index`, `None` when out of range.
    fn element_at(&self, index: usize) -> Option<Value>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Map capability: keyed entries with an observable size.
pub trait MapAccess {
    /// The current keys, in iteration order.
    fn keys(&self) -> IndexSet<Key>;

    fn get(&self, key: &Key) -> Option<Value>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A value that may take part in a watched graph.
///
/// Implementors expose at most one capability. The default implementation
/// exposes none, which makes the node an opaque leaf.
pub trait Observable: Send + Sync + 'static {
    fn as_record(&self) -> Option<&dyn RecordAccess> {
        None
    }

    fn as_sequence(&self) -> Option<&dyn SequenceAccess> {
        None
    }

    fn as_map(&self) -> Option<&dyn MapAccess> {
        None
    }

    /// Short name used in debug output.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("node")
    }
}

/// The four shapes a node can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Record,
    Sequence,
    Map,
    Leaf,
}

impl NodeKind {
    /// Whether traversal can descend into a node of this kind.
    pub fn is_container(self) -> bool {
        !matches!(self, NodeKind::Leaf)
    }

    /// Whether nodes of this kind carry a `size` locus.
    pub fn has_size(self) -> bool {
        matches!(self, NodeKind::Sequence | NodeKind::Map)
    }
}

/// Classify a value. Scalars are always leaves.
pub fn classify(value: &Value) -> NodeKind {
    match value {
        Value::Node(node) => node.kind(),
        _ => NodeKind::Leaf,
    }
}

pub(crate) fn classify_node(node: &dyn Observable) -> NodeKind {
    if node.as_record().is_some() {
        NodeKind::Record
    } else if node.as_sequence().is_some() {
        NodeKind::Sequence
    } else if node.as_map().is_some() {
        NodeKind::Map
    } else {
        NodeKind::Leaf
    }
}
