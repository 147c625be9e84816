//! Temporal samplers: choose frames by time.

use std::sync::Arc;

use braid_core::{FetchError, Timestep};
use braid_frame::{CommitFrame, FrameStore};

/// Policy selecting which committed frames a fetch reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TemporalSampler {
    /// Read only frames whose timestep equals the requested time.
    ///
    /// Never interpolates or extrapolates across frames. This is the
    /// cheapest and least lossy policy when producer and consumer step
    /// at the same rate.
    #[default]
    Exact,
}

impl TemporalSampler {
    /// Select frames from `store` for a fetch at `time`.
    ///
    /// Frames come back ordered by origin rank. Fails with
    /// [`FetchError::NoExactFrame`] when no peer committed at `time`.
    pub fn select<'a>(
        &self,
        time: Timestep,
        store: &'a FrameStore,
    ) -> Result<&'a [Arc<CommitFrame>], FetchError> {
        match self {
            Self::Exact => {
                let frames = store.frames_at(time);
                if frames.is_empty() {
                    return Err(FetchError::NoExactFrame { requested: time });
                }
                Ok(frames)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braid_core::{Point, Rank};
    use braid_frame::TaggedValue;
    use indexmap::IndexMap;

    fn frame(t: u64, origin: u32) -> Arc<CommitFrame> {
        let mut tags = IndexMap::new();
        tags.insert(
            "data".to_string(),
            vec![TaggedValue::new(Point::from([t as f64]), t as f64)],
        );
        Arc::new(CommitFrame::new(Timestep(t), Rank(origin), tags))
    }

    #[test]
    fn exact_selects_matching_timestep() {
        let mut store = FrameStore::new(&[Rank(1)], None);
        store.insert(frame(0, 1));
        store.insert(frame(2, 1));
        let frames = TemporalSampler::Exact.select(Timestep(2), &store).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].timestep(), Timestep(2));
    }

    #[test]
    fn exact_gap_is_error() {
        let mut store = FrameStore::new(&[Rank(1)], None);
        store.insert(frame(0, 1));
        store.insert(frame(2, 1));
        assert_eq!(
            TemporalSampler::Exact.select(Timestep(1), &store),
            Err(FetchError::NoExactFrame {
                requested: Timestep(1)
            })
        );
    }

    #[test]
    fn exact_gathers_all_peers() {
        let mut store = FrameStore::new(&[Rank(1), Rank(2)], None);
        store.insert(frame(3, 2));
        store.insert(frame(3, 1));
        let frames = TemporalSampler::Exact.select(Timestep(3), &store).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].origin(), Rank(1));
    }
}
