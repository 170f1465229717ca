//! Version marker identifying the inputs a graph was built from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::timetable::{Timetable, fnv1a};

use super::GraphConfig;

/// Feed version plus a hash of everything the build depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataVersion {
    pub feed_version: String,
    pub content_hash: u64,
    pub format: u32,
}

impl DataVersion {
    /// Bumped whenever the graph layout changes.
    pub const FORMAT: u32 = 1;

    /// Version of a graph built from `timetable` with `config`.
    pub fn of_build(timetable: &Timetable, config: &GraphConfig) -> Self {
        let config_bytes = serde_json::to_vec(config).unwrap_or_default();
        Self {
            feed_version: timetable.feed.version.clone(),
            content_hash: fnv1a(timetable.content_hash(), &config_bytes),
            format: Self::FORMAT,
        }
    }

    /// Placeholder for graphs assembled by hand.
    pub fn unversioned() -> Self {
        Self {
            feed_version: String::new(),
            content_hash: 0,
            format: Self::FORMAT,
        }
    }
}

impl fmt::Display for DataVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{:016x}/v{}",
            self.feed_version, self.content_hash, self.format
        )
    }
}
