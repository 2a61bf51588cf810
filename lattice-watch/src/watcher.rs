//! The consumer-facing entry points.

use tracing::debug;

use crate::config::WatchConfig;
use crate::error::{Result, WatchError};
use crate::node::{Locus, NodeRef, Value};
use crate::reactive::untrack;
use crate::watch::{Callback, Change, IgnoreSet, Traversal, TraversalMode, WatchSet};

/// Owns every watch registered through it.
///
/// A `Watcher` is meant to live as long as the thing doing the watching (a
/// page, a controller, a session). [`stop_all_watches`](Self::stop_all_watches)
/// disposes everything at once; dropping the watcher does the same.
///
/// Each entry point returns the number of watches it created.
///
/// # Example
///
/// ```rust,ignore
/// let mut watcher = Watcher::new();
/// watcher.watch_deep_detailed(
///     move || Value::node(order.clone()),
///     |change| println!("{:?}{} = {:?}", change.parent, change.locus, change.value),
///     IgnoreSet::new().field("audit"),
/// )?;
/// ```
#[derive(Debug, Default)]
pub struct Watcher {
    watches: WatchSet,
    config: WatchConfig,
}

impl Watcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: WatchConfig) -> Self {
        Self {
            watches: WatchSet::new(),
            config,
        }
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// The watches registered so far.
    pub fn watches(&self) -> &WatchSet {
        &self.watches
    }

    /// Watch one read. `callback` receives the value `read` returns, on
    /// registration and every time something `read` depends on changes.
    pub fn watch_leaf<R, C>(&mut self, read: R, callback: C) -> Result<usize>
    where
        R: Fn() -> Value + Send + Sync + 'static,
        C: Fn(&Value) + Send + Sync + 'static,
    {
        self.watch(TraversalMode::Leaf, read, Callback::value(callback), IgnoreSet::new())
    }

    /// Watch the immediate children of the node `root` returns.
    pub fn watch_shallow<R, C>(&mut self, root: R, callback: C, ignore: IgnoreSet) -> Result<usize>
    where
        R: Fn() -> Value + Send + Sync + 'static,
        C: Fn(&Locus, &Value) + Send + Sync + 'static,
    {
        self.watch(TraversalMode::Shallow, root, Callback::entry(callback), ignore)
    }

    /// Watch the whole subtree under `root` as one unit. The callback
    /// receives the root itself.
    pub fn watch_deep_silent<R, C>(&mut self, root: R, callback: C, ignore: IgnoreSet) -> Result<usize>
    where
        R: Fn() -> Value + Send + Sync + 'static,
        C: Fn(&Value) + Send + Sync + 'static,
    {
        self.watch(TraversalMode::DeepSilent, root, Callback::value(callback), ignore)
    }

    /// Watch every value under `root` individually.
    ///
    /// The graph is walked once, now. Entries added to a map later get no
    /// watch; elements appended to a sequence are reported once by the
    /// sequence's size watch but are not watched afterwards.
    pub fn watch_deep_detailed<R, C>(
        &mut self,
        root: R,
        callback: C,
        ignore: IgnoreSet,
    ) -> Result<usize>
    where
        R: Fn() -> Value + Send + Sync + 'static,
        C: Fn(&Change) + Send + Sync + 'static,
    {
        self.watch(TraversalMode::DeepDetailed, root, Callback::change(callback), ignore)
    }

    /// Register a watch with a callback chosen at runtime.
    ///
    /// In `Leaf` mode `root` is the read to watch. In every other mode it is
    /// called once, now, and must return a record, sequence or map.
    pub fn watch<R>(
        &mut self,
        mode: TraversalMode,
        root: R,
        callback: Callback,
        ignore: IgnoreSet,
    ) -> Result<usize>
    where
        R: Fn() -> Value + Send + Sync + 'static,
    {
        mode.validate(callback.shape())?;
        let traversal = Traversal::new(self.config.clone(), ignore, callback);

        if !mode.needs_container_root() {
            let watch = untrack(|| traversal.leaf(root));
            self.watches.append(watch);
            debug!(%mode, watches = 1, "registered watches");
            return Ok(1);
        }

        let root = container_root(mode, untrack(&root))?;
        let watches = untrack(|| match mode {
            TraversalMode::Shallow => traversal.shallow(&root),
            TraversalMode::DeepSilent => vec![traversal.deep_silent(&root)],
            TraversalMode::DeepDetailed => traversal.deep_detailed(&root),
            TraversalMode::Leaf => unreachable!("leaf mode handled above"),
        });

        let count = watches.len();
        self.watches.extend(watches);
        debug!(%mode, root = ?root, watches = count, "registered watches");
        Ok(count)
    }

    /// Stop every watch registered through this watcher. Safe to call any
    /// number of times.
    pub fn stop_all_watches(&mut self) {
        self.watches.stop_all();
    }
}

fn container_root(mode: TraversalMode, root: Value) -> Result<NodeRef> {
    match root.as_container() {
        Some(node) => Ok(node.clone()),
        None => Err(WatchError::InvalidArgument(format!(
            "{mode} watch root must be a record, sequence or map, got {root:?}"
        ))),
    }
}
