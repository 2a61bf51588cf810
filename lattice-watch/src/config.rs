//! Watch configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options shared by every watch a [`Watcher`](crate::Watcher) registers.
///
/// # Example
///
/// ```rust
/// use lattice_watch::WatchConfig;
///
/// let config = WatchConfig::from_json(r#"{ "max_depth": 2 }"#).unwrap();
/// assert_eq!(config.max_depth, Some(2));
/// assert!(config.fire_immediately);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchConfig {
    /// Invoke the callback during the registration run, not only on changes.
    pub fire_immediately: bool,

    /// When a sequence grows, report the appended elements after the size
    /// change.
    pub report_appended: bool,

    /// Containers at this depth or deeper are treated as leaves. The root
    /// is depth 0 and is always walked.
    pub max_depth: Option<usize>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            fire_immediately: true,
            report_appended: true,
            max_depth: None,
        }
    }
}

impl WatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn fire_immediately(mut self, fire: bool) -> Self {
        self.fire_immediately = fire;
        self
    }

    pub fn report_appended(mut self, report: bool) -> Self {
        self.report_appended = report;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Whether a container at `depth` may be descended into.
    pub(crate) fn descends_at(&self, depth: usize) -> bool {
        self.max_depth.map_or(true, |max| depth < max)
    }
}
