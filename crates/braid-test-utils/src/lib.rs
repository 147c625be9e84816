//! Test utilities and mock links for Braid development.
//!
//! - [`MockLink`] / [`MockPeer`]: drive a single interface by hand.
//! - [`run_ranks`]: run a closure per simulated rank over a
//!   [`LocalBus`](braid_transport::LocalBus).
//! - [`grid_points`], [`frame_of`], [`empty_frame`]: data fixtures.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod harness;
pub mod mock;

pub use fixtures::{empty_frame, frame_of, grid_points};
pub use harness::run_ranks;
pub use mock::{MockLink, MockPeer};
