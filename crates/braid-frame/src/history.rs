//! Ordered history of an interface's own commits.
//!
//! [`FrameHistory`] is append-only and strictly increasing in timestep.
//! An optional capacity bounds how many frames are retained; the oldest
//! frame is evicted and returned to the caller when it is exceeded.

use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use braid_core::{CommitError, Timestep};

use crate::frame::CommitFrame;

/// The local commit history of one interface.
///
/// Committed timesteps are tracked separately from the retained frames,
/// so a recommit is reported as a duplicate even after its frame was
/// evicted or forgotten.
#[derive(Debug)]
pub struct FrameHistory {
    frames: VecDeque<Arc<CommitFrame>>,
    committed: BTreeSet<Timestep>,
    capacity: Option<usize>,
}

impl FrameHistory {
    /// Create an empty history.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is `Some(0)`: such a history could never
    /// return the frame it just accepted.
    pub fn new(capacity: Option<usize>) -> Self {
        assert!(
            capacity != Some(0),
            "FrameHistory capacity must be >= 1 when bounded"
        );
        Self {
            frames: VecDeque::new(),
            committed: BTreeSet::new(),
            capacity,
        }
    }

    /// Check whether `timestep` may be committed next.
    ///
    /// Any timestep committed before is a duplicate, retained or not.
    /// Anything else at or below the last commit is out of order.
    pub fn check_next(&self, timestep: Timestep) -> Result<(), CommitError> {
        let Some(last) = self.last_committed() else {
            return Ok(());
        };
        if timestep > last {
            return Ok(());
        }
        if self.committed.contains(&timestep) {
            return Err(CommitError::Duplicate { timestep });
        }
        Err(CommitError::OutOfOrder {
            requested: timestep,
            last,
        })
    }

    /// Append a newly committed frame.
    ///
    /// Returns the frame evicted to respect the capacity, if any. On
    /// error the history is unchanged.
    pub fn append(
        &mut self,
        frame: Arc<CommitFrame>,
    ) -> Result<Option<Arc<CommitFrame>>, CommitError> {
        self.check_next(frame.timestep())?;
        self.committed.insert(frame.timestep());
        self.frames.push_back(frame);
        let evicted = match self.capacity {
            Some(cap) if self.frames.len() > cap => self.frames.pop_front(),
            _ => None,
        };
        Ok(evicted)
    }

    /// The retained frame committed at `timestep`.
    pub fn get(&self, timestep: Timestep) -> Option<&Arc<CommitFrame>> {
        self.frames
            .binary_search_by_key(&timestep, |f| f.timestep())
            .ok()
            .map(|idx| &self.frames[idx])
    }

    /// The most recently committed timestep, even if its frame was dropped.
    pub fn last_committed(&self) -> Option<Timestep> {
        self.committed.last().copied()
    }

    /// Drop every retained frame with timestep `<= upto`.
    ///
    /// Returns the number of frames dropped.
    pub fn forget(&mut self, upto: Timestep) -> usize {
        let keep_from = self.frames.partition_point(|f| f.timestep() <= upto);
        self.frames.drain(..keep_from).count()
    }

    /// Retained frames, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CommitFrame>> {
        self.frames.iter()
    }

    /// Number of retained frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frame is retained.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
