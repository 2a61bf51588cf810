//! Node Enumerator
//!
//! Lists the children of a container as [`Accessor`]s. An accessor does not
//! hold a value; it reads one when asked. The read has to happen inside the
//! watch body that should depend on it, because only a read made while the
//! body runs creates a dependency edge.

use smallvec::SmallVec;

use super::capability::NodeKind;
use super::locus::Locus;
use super::value::{NodeRef, Value};
use crate::reactive::untrack;

/// Deferred read of one child: a container handle plus a locus.
#[derive(Clone, Debug, PartialEq)]
pub struct Accessor {
    container: NodeRef,
    locus: Locus,
}

impl Accessor {
    pub fn new(container: NodeRef, locus: Locus) -> Self {
        Self { container, locus }
    }

    pub fn container(&self) -> &NodeRef {
        &self.container
    }

    pub fn locus(&self) -> &Locus {
        &self.locus
    }

    /// Read the child now. Tracked if called inside a running computation.
    ///
    /// Returns `None` when the child no longer exists, for example an index
    /// past the end of a sequence that shrank.
    pub fn read(&self) -> Option<Value> {
        let node = self.container.get();
        match &self.locus {
            Locus::Field(name) => node.as_record()?.get(name),
            Locus::Index(index) => node.as_sequence()?.element_at(*index),
            Locus::Key(key) => node.as_map()?.get(key),
            Locus::Size => {
                let len = match (node.as_sequence(), node.as_map()) {
                    (Some(seq), _) => seq.len(),
                    (None, Some(map)) => map.len(),
                    (None, None) => return None,
                };
                Some(Value::from(len))
            }
        }
    }

    /// Read the child without creating a dependency.
    pub fn peek(&self) -> Option<Value> {
        untrack(|| self.read())
    }
}

/// Enumerate the children of `node`.
///
/// Sequences and maps yield their `Size` locus first. Field names, keys and
/// the length used to produce indices are read untracked; leaves yield
/// nothing.
pub fn children_of(node: &NodeRef) -> impl Iterator<Item = Accessor> {
    let loci: SmallVec<[Locus; 8]> = untrack(|| {
        let inner = node.get();
        match node.kind() {
            NodeKind::Record => inner
                .as_record()
                .map(|record| record.field_names().into_iter().map(Locus::Field).collect())
                .unwrap_or_default(),
            NodeKind::Sequence => inner
                .as_sequence()
                .map(|seq| {
                    std::iter::once(Locus::Size)
                        .chain((0..seq.len()).map(Locus::Index))
                        .collect()
                })
                .unwrap_or_default(),
            NodeKind::Map => inner
                .as_map()
                .map(|map| {
                    std::iter::once(Locus::Size)
                        .chain(map.keys().into_iter().map(Locus::Key))
                        .collect()
                })
                .unwrap_or_default(),
            NodeKind::Leaf => SmallVec::new(),
        }
    });

    let container = node.clone();
    loci.into_iter()
        .map(move |locus| Accessor::new(container.clone(), locus))
}
