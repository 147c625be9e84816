//! Strongly-typed identifiers: [`Timestep`] and [`Rank`].

use std::fmt;

/// Index of a commit frame on an interface.
///
/// Commits on one interface use strictly increasing timesteps; a fetch
/// names the timestep whose frames it wants to sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestep(pub u64);

impl Timestep {
    /// The first timestep of a coupled run.
    pub const ZERO: Self = Self(0);
}

impl fmt::Display for Timestep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Timestep {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl From<u32> for Timestep {
    fn from(v: u32) -> Self {
        Self(u64::from(v))
    }
}

/// Position of a process in the global world of a coupled run.
///
/// Ranks are assigned densely from zero by the process-role partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(pub u32);

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Rank {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
