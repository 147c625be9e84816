//! Coupling interfaces and the interface registry.
//!
//! An [`Interface`] is one rank's endpoint on a named coupling channel.
//! It decouples production from publication:
//!
//! ```text
//! Producer rank                               Consumer rank
//!     |                                           |
//!     |--push(tag, point, value)--> PushBuffer    |
//!     |--push(...)                                |
//!     |--commit(t)--> Arc<CommitFrame> --Link-->  FrameStore
//!     |               (local FrameHistory)        |
//!     |                                           |--fetch(tag, t, samplers, wait)
//!     |                                           |   ready once every peer
//!     |                                           |   committed >= t
//! ```
//!
//! [`create_interfaces`] builds one interface per channel name for the
//! calling rank, bound through a [`Transport`](braid_transport::Transport).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod interface;
pub mod registry;

pub use config::{ConfigError, InterfaceConfig};
pub use interface::{Interface, Wait};
pub use registry::{create_interfaces, InterfaceSet, RegistryError};
