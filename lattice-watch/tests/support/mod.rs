//! Reactive containers used by the integration tests and benches.
//!
//! Every observable read goes through a `Signal`, so reads inside a watch
//! body become dependencies.

#![allow(dead_code)]

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use parking_lot::{Mutex, RwLock};

use lattice_watch::node::{MapAccess, RecordAccess, SequenceAccess};
use lattice_watch::reactive::{batch, Signal};
use lattice_watch::{Key, Observable, Value};

/// A record with a fixed set of fields.
pub struct Record {
    type_name: &'static str,
    fields: IndexMap<Arc<str>, Signal<Value>>,
}

impl Record {
    pub fn new<const N: usize>(type_name: &'static str, fields: [(&str, Value); N]) -> Arc<Self> {
        Arc::new(Self {
            type_name,
            fields: fields
                .into_iter()
                .map(|(name, value)| (Arc::from(name), Signal::new(value)))
                .collect(),
        })
    }

    pub fn set(&self, field: &str, value: impl Into<Value>) {
        let cell = self
            .fields
            .get(field)
            .unwrap_or_else(|| panic!("{} has no field {field}", self.type_name));
        cell.set(value.into());
    }
}

impl RecordAccess for Record {
    fn field_names(&self) -> IndexSet<Arc<str>> {
        self.fields.keys().cloned().collect()
    }

    fn get(&self, field: &str) -> Option<Value> {
        self.fields.get(field).map(Signal::get)
    }
}

impl Observable for Record {
    fn as_record(&self) -> Option<&dyn RecordAccess> {
        Some(self)
    }

    fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// A growable sequence with a reactive length.
pub struct List {
    items: RwLock<Vec<Signal<Value>>>,
    len: Signal<usize>,
}

impl List {
    pub fn new<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Arc<Self> {
        let items: Vec<_> = items.into_iter().map(|v| Signal::new(v.into())).collect();
        let len = Signal::new(items.len());
        Arc::new(Self {
            items: RwLock::new(items),
            len,
        })
    }

    pub fn push(&self, value: impl Into<Value>) {
        batch(|| {
            let len = {
                let mut items = self.items.write();
                items.push(Signal::new(value.into()));
                items.len()
            };
            self.len.set(len);
        });
    }

    pub fn pop(&self) {
        batch(|| {
            let len = {
                let mut items = self.items.write();
                items.pop();
                items.len()
            };
            self.len.set(len);
        });
    }

    pub fn set(&self, index: usize, value: impl Into<Value>) {
        let cell = self.items.read().get(index).cloned();
        if let Some(cell) = cell {
            cell.set(value.into());
        }
    }
}

impl SequenceAccess for List {
    fn len(&self) -> usize {
        self.len.get()
    }

    fn element_at(&self, index: usize) -> Option<Value> {
        let cell = self.items.read().get(index).cloned()?;
        Some(cell.get())
    }
}

impl Observable for List {
    fn as_sequence(&self) -> Option<&dyn SequenceAccess> {
        Some(self)
    }

    fn type_name(&self) -> &'static str {
        "List"
    }
}

/// A keyed map with a reactive size.
pub struct Dict {
    entries: RwLock<IndexMap<Key, Signal<Value>>>,
    len: Signal<usize>,
}

impl Dict {
    pub fn new<const N: usize>(entries: [(Key, Value); N]) -> Arc<Self> {
        let entries: IndexMap<_, _> = entries
            .into_iter()
            .map(|(key, value)| (key, Signal::new(value)))
            .collect();
        let len = Signal::new(entries.len());
        Arc::new(Self {
            entries: RwLock::new(entries),
            len,
        })
    }

    pub fn insert(&self, key: impl Into<Key>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();

        let existing = self.entries.read().get(&key).cloned();
        if let Some(cell) = existing {
            cell.set(value);
            return;
        }

        batch(|| {
            let len = {
                let mut entries = self.entries.write();
                entries.insert(key, Signal::new(value));
                entries.len()
            };
            self.len.set(len);
        });
    }

    pub fn remove(&self, key: impl Into<Key>) {
        let key = key.into();
        batch(|| {
            let len = {
                let mut entries = self.entries.write();
                entries.shift_remove(&key);
                entries.len()
            };
            self.len.set(len);
        });
    }
}

impl MapAccess for Dict {
    fn keys(&self) -> IndexSet<Key> {
        self.entries.read().keys().cloned().collect()
    }

    fn get(&self, key: &Key) -> Option<Value> {
        let cell = self.entries.read().get(key).cloned()?;
        Some(cell.get())
    }

    fn len(&self) -> usize {
        self.len.get()
    }
}

impl Observable for Dict {
    fn as_map(&self) -> Option<&dyn MapAccess> {
        Some(self)
    }

    fn type_name(&self) -> &'static str {
        "Dict"
    }
}

/// Shared, clonable event log for callbacks.
pub struct Log<T>(Arc<Mutex<Vec<T>>>);

impl<T> Clone for Log<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Clone> Log<T> {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(Vec::new())))
    }

    pub fn push(&self, item: T) {
        self.0.lock().push(item);
    }

    /// Everything logged so far, clearing the log.
    pub fn take(&self) -> Vec<T> {
        std::mem::take(&mut *self.0.lock())
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }
}

/// A function returning `node` as a watch root.
pub fn root<T: Observable>(node: &Arc<T>) -> impl Fn() -> Value + Send + Sync + 'static {
    let node = Arc::clone(node);
    move || Value::node(node.clone())
}
