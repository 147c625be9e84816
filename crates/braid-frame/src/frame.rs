//! Immutable commit frames.

use braid_core::{Rank, Timestep};
use indexmap::IndexMap;

use crate::value::TaggedValue;

/// The immutable result of one commit.
///
/// Holds every value pushed on one interface since the previous commit,
/// grouped by tag, keyed by the commit timestep and the committing rank.
/// Frames are never mutated after creation and are shared as
/// `Arc<CommitFrame>` between the local history and every peer.
#[derive(Debug, PartialEq)]
pub struct CommitFrame {
    timestep: Timestep,
    origin: Rank,
    tags: IndexMap<String, Vec<TaggedValue>>,
    len: usize,
}

// Compile-time assertion: frames cross thread boundaries via Arc.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<CommitFrame>();
};

impl CommitFrame {
    /// Build a frame from per-tag values.
    pub fn new(timestep: Timestep, origin: Rank, tags: IndexMap<String, Vec<TaggedValue>>) -> Self {
        let len = tags.values().map(Vec::len).sum();
        Self {
            timestep,
            origin,
            tags,
            len,
        }
    }

    /// The timestep this frame was committed at.
    pub fn timestep(&self) -> Timestep {
        self.timestep
    }

    /// The rank that committed this frame.
    pub fn origin(&self) -> Rank {
        self.origin
    }

    /// Values under `tag` in push order; empty if the tag was never pushed.
    pub fn tag(&self, tag: &str) -> &[TaggedValue] {
        self.tags.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any value was pushed under `tag` in this frame.
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// Tag names in first-push order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// Every `(tag, value)` pair in the frame.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaggedValue)> {
        self.tags
            .iter()
            .flat_map(|(tag, values)| values.iter().map(move |tv| (tag.as_str(), tv)))
    }

    /// Total number of values across all tags.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the frame carries no values (a pure time barrier).
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
