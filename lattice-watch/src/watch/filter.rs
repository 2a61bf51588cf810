//! Ignore sets.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::node::{Key, Locus};

/// Loci excluded from a watch.
///
/// An excluded locus gets no watch and, in deep modes, is not descended
/// into. The set applies at every depth: ignoring `Field("meta")` skips
/// every field named `meta` in the traversed graph. [`IgnoreSet::size`]
/// excludes the size of every sequence and map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreSet {
    loci: HashSet<Locus>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<Arc<str>>) -> Self {
        self.loci.insert(Locus::Field(name.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.loci.insert(Locus::Index(index));
        self
    }

    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.loci.insert(Locus::Key(key.into()));
        self
    }

    pub fn size(mut self) -> Self {
        self.loci.insert(Locus::Size);
        self
    }

    pub fn insert(&mut self, locus: Locus) -> bool {
        self.loci.insert(locus)
    }

    /// Whether `locus` may be watched.
    pub fn admit(&self, locus: &Locus) -> bool {
        !self.loci.contains(locus)
    }

    pub fn is_empty(&self) -> bool {
        self.loci.is_empty()
    }

    pub fn len(&self) -> usize {
        self.loci.len()
    }
}

impl FromIterator<Locus> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = Locus>>(iter: I) -> Self {
        Self {
            loci: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[&str; N]> for IgnoreSet {
    /// Ignore the given field names.
    fn from(fields: [&str; N]) -> Self {
        fields.into_iter().map(Locus::field).collect()
    }
}
