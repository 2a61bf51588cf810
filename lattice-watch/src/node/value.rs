//! Values flowing through a watched graph.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::capability::{NodeKind, Observable};

/// Shared handle to an observable node, compared by identity.
#[derive(Clone)]
pub struct NodeRef(Arc<dyn Observable>);

impl NodeRef {
    /// Wrap a shared node.
    pub fn new<T: Observable>(node: Arc<T>) -> Self {
        Self(node)
    }

    /// Wrap an already type-erased node.
    pub fn from_dyn(node: Arc<dyn Observable>) -> Self {
        Self(node)
    }

    /// Borrow the node's capabilities.
    pub fn get(&self) -> &dyn Observable {
        &*self.0
    }

    /// Identity of the node, stable for as long as the node is alive.
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    /// Whether two handles point at the same node.
    pub fn ptr_eq(&self, other: &NodeRef) -> bool {
        self.addr() == other.addr()
    }

    /// Whether this handle points at `node`.
    pub fn is<T: Observable>(&self, node: &Arc<T>) -> bool {
        self.addr() == Arc::as_ptr(node) as *const () as usize
    }

    /// Classify the node by the capability it exposes.
    pub fn kind(&self) -> NodeKind {
        super::capability::classify_node(self.get())
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for NodeRef {}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:#x}", self.0.type_name(), self.addr())
    }
}

/// A value read from a record field, sequence element, map entry or size.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(Arc<str>),
    Node(NodeRef),
}

impl Value {
    /// Wrap a shared node as a value.
    pub fn node<T: Observable>(node: Arc<T>) -> Self {
        Value::Node(NodeRef::new(node))
    }

    /// The node handle, if this value is a node.
    pub fn as_node(&self) -> Option<&NodeRef> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(&**s),
            _ => None,
        }
    }

    /// The node handle, if this value is a node with a container capability.
    pub fn as_container(&self) -> Option<&NodeRef> {
        self.as_node().filter(|node| node.kind().is_container())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Node(a), Value::Node(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(Arc::from(s))
    }
}

impl From<NodeRef> for Value {
    fn from(node: NodeRef) -> Self {
        Value::Node(node)
    }
}

/// A map key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Bool(bool),
    Int(i64),
    Text(Arc<str>),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Bool(b) => write!(f, "{b}"),
            Key::Int(i) => write!(f, "{i}"),
            Key::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Key::Bool(b)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Int(i64::from(i))
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Text(Arc::from(s))
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Text(Arc::from(s))
    }
}
