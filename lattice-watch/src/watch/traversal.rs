//! Traversal Engine
//!
//! Walks a graph of observable nodes and registers watches over it. Reads
//! made during setup go through [`Accessor::peek`]; only the reads inside
//! watch bodies are tracked.
//!
//! Every walk keeps a visited set of node identities, so a node reachable
//! through several paths (or through a cycle) is walked once per traversal.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::filter::IgnoreSet;
use super::registrar::{register, Watch};
use super::Callback;
use crate::config::WatchConfig;
use crate::node::{children_of, Accessor, Locus, NodeKind, NodeRef, Value};

/// One registration's worth of traversal state.
#[derive(Debug, Clone)]
pub(crate) struct Traversal {
    config: Arc<WatchConfig>,
    ignore: Arc<IgnoreSet>,
    callback: Callback,
}

impl Traversal {
    pub(crate) fn new(config: WatchConfig, ignore: IgnoreSet, callback: Callback) -> Self {
        Self {
            config: Arc::new(config),
            ignore: Arc::new(ignore),
            callback,
        }
    }

    /// One watch around `read`; the callback gets whatever it returns.
    pub(crate) fn leaf<R>(&self, read: R) -> Watch
    where
        R: Fn() -> Value + Send + Sync + 'static,
    {
        let callback = self.callback.clone();
        let primed = AtomicBool::new(self.config.fire_immediately);
        register(move || {
            let value = read();
            if primed.swap(true, Ordering::SeqCst) {
                callback.emit_value(&value);
            }
        })
    }

    /// One watch per admitted immediate child of `root`.
    pub(crate) fn shallow(&self, root: &NodeRef) -> Vec<Watch> {
        children_of(root)
            .filter(|accessor| self.ignore.admit(accessor.locus()))
            .map(|accessor| self.child_watch(accessor))
            .collect()
    }

    /// A single watch that depends on the whole admitted subtree of `root`.
    pub(crate) fn deep_silent(&self, root: &NodeRef) -> Watch {
        let walker = self.clone();
        let root = root.clone();
        let primed = AtomicBool::new(self.config.fire_immediately);
        register(move || {
            walker.read_subtree(&root, 0, &mut HashSet::new());
            if primed.swap(true, Ordering::SeqCst) {
                walker.callback.emit_value(&Value::Node(root.clone()));
            }
        })
    }

    /// One watch per admitted leaf plus one per sequence or map size.
    pub(crate) fn deep_detailed(&self, root: &NodeRef) -> Vec<Watch> {
        let mut watches = Vec::new();
        self.walk_detailed(root, 0, &mut HashSet::new(), &mut watches);
        watches
    }

    fn walk_detailed(
        &self,
        node: &NodeRef,
        depth: usize,
        visited: &mut HashSet<usize>,
        watches: &mut Vec<Watch>,
    ) {
        if !visited.insert(node.addr()) {
            debug!(node = ?node, "node already visited; not walking it again");
            return;
        }

        for accessor in children_of(node) {
            if !self.ignore.admit(accessor.locus()) {
                continue;
            }
            if accessor.locus().is_size() {
                watches.push(self.child_watch(accessor));
                continue;
            }

            let child = accessor.peek();
            match child.as_ref().and_then(Value::as_container) {
                Some(child) if self.config.descends_at(depth + 1) => {
                    self.walk_detailed(child, depth + 1, visited, watches);
                }
                _ => watches.push(self.child_watch(accessor)),
            }
        }
    }

    /// Read every admitted size and leaf under `node`. Run inside a watch
    /// body, this makes the watch depend on all of them.
    fn read_subtree(&self, node: &NodeRef, depth: usize, visited: &mut HashSet<usize>) {
        if !visited.insert(node.addr()) {
            return;
        }

        for accessor in children_of(node) {
            if !self.ignore.admit(accessor.locus()) {
                continue;
            }
            let child = accessor.read();
            if let Some(child) = child.as_ref().and_then(Value::as_container) {
                if self.config.descends_at(depth + 1) {
                    self.read_subtree(child, depth + 1, visited);
                }
            }
        }
    }

    fn child_watch(&self, accessor: Accessor) -> Watch {
        if accessor.locus().is_size() {
            return self.size_watch(accessor);
        }

        let callback = self.callback.clone();
        let primed = AtomicBool::new(self.config.fire_immediately);
        register(move || {
            let value = accessor.read();
            if primed.swap(true, Ordering::SeqCst) {
                if let Some(value) = value {
                    callback.emit_child(accessor.container(), accessor.locus(), &value);
                }
            }
        })
    }

    /// Watch a container's size. When a sequence grows, the elements past
    /// the previous length are reported after the size, read untracked so
    /// this watch does not come to depend on them.
    fn size_watch(&self, accessor: Accessor) -> Watch {
        let callback = self.callback.clone();
        let ignore = Arc::clone(&self.ignore);
        let report_appended = self.config.report_appended
            && accessor.container().kind() == NodeKind::Sequence;
        let primed = AtomicBool::new(self.config.fire_immediately);
        let last_len: Mutex<Option<usize>> = Mutex::new(None);

        register(move || {
            let Some(size) = accessor.read() else {
                return;
            };
            let len = size
                .as_int()
                .and_then(|n| usize::try_from(n).ok())
                .unwrap_or(0);

            if primed.swap(true, Ordering::SeqCst) {
                callback.emit_child(accessor.container(), &Locus::Size, &size);
            }

            let previous = last_len.lock().replace(len);
            if !report_appended {
                return;
            }
            let Some(previous) = previous else {
                return;
            };
            for index in previous..len {
                let appended = Accessor::new(accessor.container().clone(), Locus::Index(index));
                if !ignore.admit(appended.locus()) {
                    continue;
                }
                if let Some(value) = appended.peek() {
                    callback.emit_child(appended.container(), appended.locus(), &value);
                }
            }
        })
    }
}
