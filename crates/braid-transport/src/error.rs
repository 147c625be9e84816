//! Transport error types.

use std::error::Error;
use std::fmt;

use braid_core::Rank;

/// Errors from partitioning and channel setup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportError {
    /// `split_by_app` was given no ranks.
    EmptyWorld,
    /// A rank was assigned an empty application name.
    EmptyAppName {
        /// The offending rank.
        rank: Rank,
    },
    /// The partition's world size disagrees with the transport's.
    WorldSizeMismatch {
        /// World size the transport was built for.
        expected: usize,
        /// World size recorded in the partition.
        got: usize,
    },
    /// The partition's rank lies outside the transport's world.
    RankOutOfRange {
        /// The offending rank.
        rank: Rank,
        /// World size the transport was built for.
        world_size: usize,
    },
    /// The same channel was requested twice in one `open` call.
    DuplicateChannel {
        /// The repeated channel name.
        name: String,
    },
    /// Another rank's request in the same collective `open` was invalid.
    PeerSetupFailed {
        /// The first rank that failed.
        rank: Rank,
    },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyWorld => write!(f, "world has no ranks"),
            Self::EmptyAppName { rank } => {
                write!(f, "rank {rank} has an empty application name")
            }
            Self::WorldSizeMismatch { expected, got } => {
                write!(f, "partition world size {got} does not match transport world size {expected}")
            }
            Self::RankOutOfRange { rank, world_size } => {
                write!(f, "rank {rank} outside world of size {world_size}")
            }
            Self::DuplicateChannel { name } => {
                write!(f, "channel '{name}' requested twice")
            }
            Self::PeerSetupFailed { rank } => {
                write!(f, "channel setup failed on rank {rank}")
            }
        }
    }
}

impl Error for TransportError {}

/// Errors from receiving on a [`Link`](crate::Link).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecvError {
    /// The deadline passed with nothing received.
    Timeout,
    /// Every peer link has been dropped and the inbox is drained.
    Disconnected,
}

impl fmt::Display for RecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "receive deadline passed"),
            Self::Disconnected => write!(f, "all peers disconnected"),
        }
    }
}

impl Error for RecvError {}
