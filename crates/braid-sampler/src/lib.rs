//! Sampling policies for fetching from committed frames.
//!
//! Samplers are plain values chosen per fetch call, not objects owned by
//! an interface:
//!
//! - [`TemporalSampler`] selects which peer frames a fetch reads, by time.
//! - [`SpatialSampler`] reduces the `(Point, value)` pairs of one tag in
//!   those frames to a single value at a query point.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod spatial;
pub mod temporal;

pub use spatial::SpatialSampler;
pub use temporal::TemporalSampler;
