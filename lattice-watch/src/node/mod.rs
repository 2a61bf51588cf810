//! Observable Nodes
//!
//! The data model a watch walks over: values, the capabilities that make a
//! node a container, loci naming children, and the enumerator producing
//! deferred reads of those children.
//!
//! This module does not define any container type. Anything implementing
//! [`Observable`] can be watched; the reactive runtime only needs the
//! container's reads to go through [`Signal`](crate::reactive::Signal)s (or
//! anything else that reports to the runtime).

mod capability;
mod enumerate;
mod locus;
mod value;

pub use capability::{classify, MapAccess, NodeKind, Observable, RecordAccess, SequenceAccess};
pub use enumerate::{children_of, Accessor};
pub use locus::Locus;
pub use value::{Key, NodeRef, Value};
