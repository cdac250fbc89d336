//! The record of merge decisions.
//!
//! Unlike a classic union-find, links are never rewritten: a segment is attached to the segment
//! that superseded it exactly once, so the forest is a faithful history of every merge.

use crate::{SegmentError, SegmentId};

/// Maps each superseded segment to the merged segment that replaced it
#[derive(Debug, Default, Clone)]
pub struct SegmentForest {
    parents: Vec<Option<SegmentId>>,
    len: usize,
}

impl SegmentForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of parent entries recorded so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The segment that superseded `segment`, if any.
    pub fn parent(&self, segment: SegmentId) -> Option<SegmentId> {
        self.parents.get(segment.index()).copied().flatten()
    }

    /// A segment without a parent is a root, i.e. a current region.
    pub fn is_root(&self, segment: SegmentId) -> bool {
        self.parent(segment).is_none()
    }

    /// Follows parent links to the top-level segment containing `segment`.
    pub fn find_root(&self, segment: SegmentId) -> SegmentId {
        let mut cur = segment;
        while let Some(parent) = self.parent(cur) {
            cur = parent;
        }
        cur
    }

    /// Records that `child` was superseded by `parent`.
    /// Fails if `child` already has a parent or if the link would close a cycle.
    pub fn attach(&mut self, child: SegmentId, parent: SegmentId) -> Result<(), SegmentError> {
        if !self.is_root(child) || self.find_root(parent) == child {
            return Err(SegmentError::ForestConflict(child.0));
        }
        if self.parents.len() <= child.index() {
            self.parents.resize(child.index() + 1, None);
        }
        self.parents[child.index()] = Some(parent);
        self.len += 1;
        Ok(())
    }

    /// Number of links from `segment` to its root.
    pub fn depth(&self, segment: SegmentId) -> usize {
        let mut depth = 0;
        let mut cur = segment;
        while let Some(parent) = self.parent(cur) {
            depth += 1;
            cur = parent;
        }
        depth
    }
}
