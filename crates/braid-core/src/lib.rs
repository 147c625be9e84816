//! Core types for the Braid coupling framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other Braid crate: timestep and rank
//! identifiers, the [`Point`] coordinate type, and the error enums
//! returned by push, commit, and fetch.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod point;

pub use error::{CommitError, FetchError, PushError};
pub use id::{Rank, Timestep};
pub use point::Point;
