//! Braid: point-indexed, timestep-synchronized data exchange between
//! coupled solvers.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Braid sub-crates. For most users, adding `braid` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use braid::prelude::*;
//!
//! // A world of one rank: the interface has no peers.
//! let parts = split_by_app(&["ping"]).unwrap();
//! let bus = LocalBus::new(1);
//! let mut set =
//!     create_interfaces("ping", &["ifs1"], &parts[0], &bus, &InterfaceConfig::default()).unwrap();
//! let ifs = &mut set["ifs1"];
//!
//! for i in 0..100 {
//!     for j in 0..100 {
//!         ifs.push("data", [i as f64, j as f64], 293.0).unwrap();
//!     }
//! }
//! assert_eq!(ifs.commit(0u64), Ok(10_000));
//! assert_eq!(ifs.last_committed(), Some(Timestep(0)));
//! assert!(matches!(ifs.commit(0u64), Err(CommitError::Duplicate { .. })));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `braid-core` | Timesteps, ranks, points, error types |
//! | [`frame`] | `braid-frame` | Push buffers, commit frames, frame history and store |
//! | [`sampler`] | `braid-sampler` | Spatial and temporal samplers |
//! | [`transport`] | `braid-transport` | Partitioning, `Transport`/`Link`, in-process bus |
//! | [`engine`] | `braid-engine` | `Interface`, configuration, interface registry |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and errors (`braid-core`).
///
/// [`types::Timestep`], [`types::Rank`], [`types::Point`], and the
/// push/commit/fetch error enums.
pub use braid_core as types;

/// Push buffers and immutable frames (`braid-frame`).
pub use braid_frame as frame;

/// Spatial and temporal samplers (`braid-sampler`).
pub use braid_sampler as sampler;

/// Process-role partitioning and frame transport (`braid-transport`).
///
/// Implement [`transport::Transport`] and [`transport::Link`] to couple
/// over something other than the in-process [`transport::LocalBus`].
pub use braid_transport as transport;

/// Coupling interfaces and the interface registry (`braid-engine`).
pub use braid_engine as engine;

/// Common imports for typical Braid usage.
///
/// ```rust
/// use braid::prelude::*;
/// ```
pub mod prelude {
    // Core types and errors
    pub use braid_core::{CommitError, FetchError, Point, PushError, Rank, Timestep};

    // Samplers
    pub use braid_sampler::{SpatialSampler, TemporalSampler};

    // Transport
    pub use braid_transport::{split_by_app, LocalBus, Partition, Transport};

    // Engine
    pub use braid_engine::{
        create_interfaces, Interface, InterfaceConfig, InterfaceSet, RegistryError, Wait,
    };
}
