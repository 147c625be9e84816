//! Spatial samplers: reduce a frame's points to a value at a query point.

use std::sync::Arc;

use braid_core::{FetchError, Point};
use braid_frame::{CommitFrame, TaggedValue};

/// Default per-coordinate tolerance of [`SpatialSampler::Exact`].
pub const DEFAULT_EXACT_TOLERANCE: f64 = 1e-9;

/// Policy producing one value at a query point from pushed points.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub enum SpatialSampler {
    /// The first pushed point whose every coordinate lies within
    /// `tolerance` of the query. Duplicates resolve to the earliest
    /// (lowest origin rank, then push order).
    Exact {
        /// Per-coordinate absolute tolerance.
        tolerance: f64,
    },
    /// The closest pushed point within Euclidean distance `radius`.
    /// Equidistant candidates resolve to the earliest.
    PseudoNearestNeighbor {
        /// Search radius.
        radius: f64,
    },
}

impl Default for SpatialSampler {
    fn default() -> Self {
        Self::exact()
    }
}

impl SpatialSampler {
    /// Exact match with [`DEFAULT_EXACT_TOLERANCE`].
    pub fn exact() -> Self {
        Self::Exact {
            tolerance: DEFAULT_EXACT_TOLERANCE,
        }
    }

    /// Nearest neighbour within `radius`.
    pub fn nearest(radius: f64) -> Self {
        Self::PseudoNearestNeighbor { radius }
    }

    /// Sample `tag` of `frames` at `query`.
    ///
    /// Fails with [`FetchError::NoMatchingPoint`] when no pushed point
    /// qualifies.
    pub fn sample(
        &self,
        tag: &str,
        query: &Point,
        frames: &[Arc<CommitFrame>],
    ) -> Result<f64, FetchError> {
        let candidates = frames.iter().flat_map(|f| f.tag(tag).iter());
        let found = match *self {
            Self::Exact { tolerance } => candidates
                .into_iter()
                .find(|tv| tv.point.approx_eq(query, tolerance))
                .map(|tv| tv.value),
            Self::PseudoNearestNeighbor { radius } => nearest_within(candidates, query, radius),
        };
        found.ok_or_else(|| FetchError::NoMatchingPoint {
            tag: tag.to_owned(),
            point: query.clone(),
        })
    }
}

fn nearest_within<'a>(
    candidates: impl Iterator<Item = &'a TaggedValue>,
    query: &Point,
    radius: f64,
) -> Option<f64> {
    let radius_sq = radius * radius;
    let mut best: Option<(f64, f64)> = None;
    for tv in candidates {
        if tv.point.dims() != query.dims() {
            continue;
        }
        let d = tv.point.distance_sq(query);
        if d > radius_sq {
            continue;
        }
        // Strict comparison keeps the earliest of equidistant points.
        if best.map_or(true, |(best_d, _)| d < best_d) {
            best = Some((d, tv.value));
        }
    }
    best.map(|(_, value)| value)
}
