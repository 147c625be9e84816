//! Process-role partitioning and frame transport.
//!
//! Moving frames between processes is delegated to this crate. The
//! engine only sees two seams:
//!
//! - [`Partition`]: the calling rank's place in the world, produced once
//!   at startup by [`split_by_app`] and passed into interface creation.
//! - [`Transport`] / [`Link`]: a collective `open` that binds named
//!   channels, and per-channel links that publish committed frames to
//!   peers and receive theirs.
//!
//! [`LocalBus`] implements both in-process, with each simulated rank
//! running on its own thread. Links deliver a given peer's frames in
//! commit order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod link;
pub mod local;
pub mod partition;

pub use error::{RecvError, TransportError};
pub use link::{Envelope, Link, Transport};
pub use local::{LocalBus, LocalLink};
pub use partition::{split_by_app, Partition};
