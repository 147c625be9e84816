//! Reusable point and frame fixtures.

use std::sync::Arc;

use braid_core::{Point, Rank, Timestep};
use braid_frame::{CommitFrame, PushBuffer};

/// An `nx` by `ny` grid of 2-D points at integer coordinates, row-major.
pub fn grid_points(nx: usize, ny: usize) -> Vec<Point> {
    (0..nx)
        .flat_map(|i| (0..ny).map(move |j| Point::from([i as f64, j as f64])))
        .collect()
}

/// A frame from `origin` at `timestep` holding `values[i]` at
/// `points[i]` under `tag`.
///
/// # Panics
///
/// Panics if the points disagree in dimension or the lengths differ.
pub fn frame_of(
    timestep: u64,
    origin: u32,
    tag: &str,
    points: &[Point],
    values: &[f64],
) -> Arc<CommitFrame> {
    let dims = points.first().map_or(1, Point::dims);
    let mut buf = PushBuffer::new(dims);
    buf.push_many(tag, points, values)
        .unwrap_or_else(|e| panic!("bad fixture frame: {e}"));
    Arc::new(buf.take_frame(Timestep(timestep), Rank(origin)))
}

/// A frame from `origin` at `timestep` with no values.
pub fn empty_frame(timestep: u64, origin: u32) -> Arc<CommitFrame> {
    Arc::new(PushBuffer::new(1).take_frame(Timestep(timestep), Rank(origin)))
}
