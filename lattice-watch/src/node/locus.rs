//! Loci: where a child sits inside its parent.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::value::Key;

/// Identifies one child under a parent container.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locus {
    /// A record field.
    Field(Arc<str>),
    /// A sequence element.
    Index(usize),
    /// A map entry.
    Key(Key),
    /// The size of a sequence or map.
    Size,
}

impl Locus {
    pub fn field(name: impl Into<Arc<str>>) -> Self {
        Locus::Field(name.into())
    }

    pub fn key(key: impl Into<Key>) -> Self {
        Locus::Key(key.into())
    }

    pub fn is_size(&self) -> bool {
        matches!(self, Locus::Size)
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locus::Field(name) => write!(f, ".{name}"),
            Locus::Index(i) => write!(f, "[{i}]"),
            Locus::Key(key) => write!(f, "[{key}]"),
            Locus::Size => f.write_str("#size"),
        }
    }
}
