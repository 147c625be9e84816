//! Frames received from peers: the remote view of a coupling channel.
//!
//! [`FrameStore`] indexes peer frames by timestep and tracks, per peer,
//! the latest timestep that peer has committed (its *horizon*). A fetch
//! at time `t` is ready once every peer's horizon has reached `t`:
//! peers commit in increasing timestep order, so no frame at or before
//! `t` can arrive afterwards.

use std::collections::BTreeMap;
use std::sync::Arc;

use braid_core::{Rank, Timestep};
use indexmap::IndexMap;

use crate::frame::CommitFrame;

/// Peer frames of one interface, ordered by timestep.
#[derive(Debug)]
pub struct FrameStore {
    /// Frames per timestep, ordered by origin rank.
    frames: BTreeMap<Timestep, Vec<Arc<CommitFrame>>>,
    horizons: IndexMap<Rank, Option<Timestep>>,
    capacity: Option<usize>,
}

impl FrameStore {
    /// Create an empty store expecting frames from `peers`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is `Some(0)`.
    pub fn new(peers: &[Rank], capacity: Option<usize>) -> Self {
        assert!(
            capacity != Some(0),
            "FrameStore capacity must be >= 1 when bounded"
        );
        Self {
            frames: BTreeMap::new(),
            horizons: peers.iter().map(|&r| (r, None)).collect(),
            capacity,
        }
    }

    /// Record a frame received from a peer.
    ///
    /// Advances that peer's horizon. Frames from ranks not declared as
    /// peers are stored but do not gate readiness. Returns the number of
    /// timesteps evicted to respect the capacity.
    pub fn insert(&mut self, frame: Arc<CommitFrame>) -> usize {
        let t = frame.timestep();
        let origin = frame.origin();
        if let Some(h) = self.horizons.get_mut(&origin) {
            *h = Some(h.map_or(t, |prev| prev.max(t)));
        }
        let slot = self.frames.entry(t).or_default();
        let idx = slot.partition_point(|f| f.origin() <= origin);
        slot.insert(idx, frame);

        let mut evicted = 0;
        if let Some(cap) = self.capacity {
            while self.frames.len() > cap {
                self.frames.pop_first();
                evicted += 1;
            }
        }
        evicted
    }

    /// Frames committed at exactly `timestep`, ordered by origin rank.
    pub fn frames_at(&self, timestep: Timestep) -> &[Arc<CommitFrame>] {
        self.frames
            .get(&timestep)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Timesteps with at least one retained frame, ascending.
    pub fn timesteps(&self) -> impl Iterator<Item = Timestep> + '_ {
        self.frames.keys().copied()
    }

    /// The latest timestep committed by `peer`, if any.
    pub fn peer_horizon(&self, peer: Rank) -> Option<Timestep> {
        self.horizons.get(&peer).copied().flatten()
    }

    /// The lowest horizon across all peers.
    ///
    /// `None` when there are no peers or some peer has not committed yet.
    pub fn horizon(&self) -> Option<Timestep> {
        if self.horizons.is_empty() {
            return None;
        }
        self.horizons
            .values()
            .try_fold(Timestep(u64::MAX), |acc, h| h.map(|h| acc.min(h)))
    }

    /// Whether every peer has committed at or beyond `timestep`.
    pub fn is_ready(&self, timestep: Timestep) -> bool {
        self.horizon().is_some_and(|h| h >= timestep)
    }

    /// The declared peers, in declaration order.
    pub fn peers(&self) -> impl Iterator<Item = Rank> + '_ {
        self.horizons.keys().copied()
    }

    /// Drop every frame with timestep `<= upto`. Horizons are kept.
    ///
    /// Returns the number of frames dropped.
    pub fn forget(&mut self, upto: Timestep) -> usize {
        let keep = match upto.0.checked_add(1) {
            Some(next) => self.frames.split_off(&Timestep(next)),
            None => BTreeMap::new(),
        };
        let dropped = std::mem::replace(&mut self.frames, keep);
        dropped.values().map(Vec::len).sum()
    }

    /// Number of retained frames across all timesteps.
    pub fn frame_count(&self) -> usize {
        self.frames.values().map(Vec::len).sum()
    }

    /// Whether no frame is retained.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TaggedValue;
    use braid_core::Point;

    fn frame(t: u64, origin: u32, value: f64) -> Arc<CommitFrame> {
        let mut tags = IndexMap::new();
        tags.insert(
            "data".to_string(),
            vec![TaggedValue::new(Point::from([0.0]), value)],
        );
        Arc::new(CommitFrame::new(Timestep(t), Rank(origin), tags))
    }

    #[test]
    fn no_peers_never_ready() {
        let store = FrameStore::new(&[], None);
        assert_eq!(store.horizon(), None);
        assert!(!store.is_ready(Timestep(0)));
    }

    #[test]
    fn horizon_is_minimum_over_peers() {
        let mut store = FrameStore::new(&[Rank(1), Rank(2)], None);
        store.insert(frame(0, 1, 1.0));
        store.insert(frame(1, 1, 1.0));
        assert_eq!(store.horizon(), None);
        assert!(!store.is_ready(Timestep(0)));

        store.insert(frame(0, 2, 2.0));
        assert_eq!(store.horizon(), Some(Timestep(0)));
        assert!(store.is_ready(Timestep(0)));
        assert!(!store.is_ready(Timestep(1)));
        assert_eq!(store.peer_horizon(Rank(1)), Some(Timestep(1)));
    }

    #[test]
    fn frames_at_ordered_by_origin() {
        let mut store = FrameStore::new(&[Rank(1), Rank(3)], None);
        store.insert(frame(4, 3, 3.0));
        store.insert(frame(4, 1, 1.0));
        let origins: Vec<Rank> = store
            .frames_at(Timestep(4))
            .iter()
            .map(|f| f.origin())
            .collect();
        assert_eq!(origins, vec![Rank(1), Rank(3)]);
        assert!(store.frames_at(Timestep(5)).is_empty());
    }

    #[test]
    fn undeclared_origin_does_not_gate() {
        let mut store = FrameStore::new(&[Rank(1)], None);
        store.insert(frame(0, 9, 1.0));
        assert!(!store.is_ready(Timestep(0)));
        assert_eq!(store.frame_count(), 1);
    }

    #[test]
    fn capacity_evicts_oldest_timestep() {
        let mut store = FrameStore::new(&[Rank(1)], Some(2));
        assert_eq!(store.insert(frame(0, 1, 0.0)), 0);
        assert_eq!(store.insert(frame(1, 1, 0.0)), 0);
        assert_eq!(store.insert(frame(2, 1, 0.0)), 1);
        assert_eq!(
            store.timesteps().collect::<Vec<_>>(),
            vec![Timestep(1), Timestep(2)]
        );
        assert_eq!(store.peer_horizon(Rank(1)), Some(Timestep(2)));
    }

    #[test]
    fn forget_drops_inclusive() {
        let mut store = FrameStore::new(&[Rank(1)], None);
        for t in 0..4 {
            store.insert(frame(t, 1, t as f64));
        }
        assert_eq!(store.forget(Timestep(1)), 2);
        assert_eq!(
            store.timesteps().collect::<Vec<_>>(),
            vec![Timestep(2), Timestep(3)]
        );
        assert!(store.is_ready(Timestep(3)));
        assert_eq!(store.forget(Timestep(u64::MAX)), 2);
        assert!(store.is_empty());
    }
}
