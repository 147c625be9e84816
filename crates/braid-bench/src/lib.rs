//! Benchmark profiles for the Braid coupling interface.
//!
//! - [`reference_grid`]: the 100x100 grid at a uniform 293.0 that a
//!   single coupling step pushes.
//! - [`scattered_points`]: deterministic pseudo-random points for
//!   sampler lookups.
//! - [`reference_frame`]: a committed frame over a profile.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use braid_core::{Point, Rank, Timestep};
use braid_frame::{CommitFrame, PushBuffer};

/// Value pushed at every point of the reference grid.
pub const REFERENCE_VALUE: f64 = 293.0;

/// Points and values of an `n` by `n` grid, row-major, all
/// [`REFERENCE_VALUE`].
pub fn reference_grid(n: usize) -> (Vec<Point>, Vec<f64>) {
    let points: Vec<Point> = (0..n)
        .flat_map(|i| (0..n).map(move |j| Point::from([i as f64, j as f64])))
        .collect();
    let values = vec![REFERENCE_VALUE; points.len()];
    (points, values)
}

/// `count` 2-D points inside `[0, extent)^2`, deterministic in `seed`.
pub fn scattered_points(count: usize, extent: f64, seed: u64) -> Vec<Point> {
    (0..count as u64)
        .map(|i| {
            let k = i.wrapping_add(seed);
            let x = (k.wrapping_mul(6364136223846793007) >> 11) as f64 / (1u64 << 53) as f64;
            let y = (k.wrapping_mul(1442695040888963407) >> 11) as f64 / (1u64 << 53) as f64;
            Point::from([x * extent, y * extent])
        })
        .collect()
}

/// A frame at `timestep` from rank 0 holding the given profile under
/// `"data"`.
///
/// # Panics
///
/// Panics if `points` are not 2-D or the lengths differ.
pub fn reference_frame(timestep: u64, points: &[Point], values: &[f64]) -> Arc<CommitFrame> {
    let mut buf = PushBuffer::new(2);
    if let Err(e) = buf.push_many("data", points, values) {
        panic!("invalid benchmark profile: {e}");
    }
    Arc::new(buf.take_frame(Timestep(timestep), Rank(0)))
}
