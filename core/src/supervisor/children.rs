//! The set of live children, keyed by task index.
//!
//! A flat `BTreeMap<usize, LiveChild>` rather than a group-keyed map: this supervisor has
//! no task-group concept, only a flat list of task indices.
use std::collections::BTreeMap;

use command_group::GroupChild;

use crate::format::LineSplitter;

/// One running child: its process-group handle plus the line-buffering state for each of
/// its two streams.
pub struct LiveChild {
    pub child: GroupChild,
    pub pid: Option<u32>,
    pub name: Option<String>,
    pub raw: bool,
    pub stdout_splitter: LineSplitter,
    pub stderr_splitter: LineSplitter,
}

/// Live children keyed by task index.
#[derive(Default)]
pub struct Children(pub BTreeMap<usize, LiveChild>);

impl Children {
    pub fn insert(&mut self, index: usize, child: LiveChild) {
        self.0.insert(index, child);
    }

    pub fn remove(&mut self, index: usize) -> Option<LiveChild> {
        self.0.remove(&index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut LiveChild> {
        self.0.get_mut(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A snapshot of currently-live indices, safe to iterate while mutating the map.
    pub fn indices(&self) -> Vec<usize> {
        self.0.keys().copied().collect()
    }
}
