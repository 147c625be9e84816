//! Error types for the Braid coupling framework.
//!
//! Organized by operation: push (local buffering), commit (frame
//! publication), and fetch (sampling committed frames). Setup errors
//! live next to the registry in `braid-engine`; transport errors live
//! in `braid-transport`.

use std::error::Error;
use std::fmt;

use crate::id::Timestep;
use crate::point::Point;

/// Errors from `push` and `push_many`.
///
/// Nothing is buffered when a push fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PushError {
    /// The point's dimensionality disagrees with the interface configuration.
    DimensionMismatch {
        /// Dimensionality configured on the interface.
        expected: usize,
        /// Dimensionality of the pushed point.
        got: usize,
    },
    /// A coordinate of the pushed point is NaN or infinite.
    NonFiniteCoordinate {
        /// Index of the first offending coordinate.
        axis: usize,
    },
    /// The tag is the empty string.
    EmptyTag,
    /// `push_many` received point and value slices of different lengths.
    LengthMismatch {
        /// Number of points supplied.
        points: usize,
        /// Number of values supplied.
        values: usize,
    },
}

impl fmt::Display for PushError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DimensionMismatch { expected, got } => {
                write!(f, "point has {got} dimensions, interface expects {expected}")
            }
            Self::NonFiniteCoordinate { axis } => {
                write!(f, "point coordinate {axis} is not finite")
            }
            Self::EmptyTag => write!(f, "tag must not be empty"),
            Self::LengthMismatch { points, values } => {
                write!(f, "{points} points supplied with {values} values")
            }
        }
    }
}

impl Error for PushError {}

/// Errors from `commit`.
///
/// Both variants are logical faults in the caller: they must be
/// propagated, never swallowed. A failed commit leaves the push buffer
/// and the commit history untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitError {
    /// The timestep was already committed on this interface.
    Duplicate {
        /// The repeated timestep.
        timestep: Timestep,
    },
    /// The timestep precedes the most recent commit.
    OutOfOrder {
        /// The timestep the caller tried to commit.
        requested: Timestep,
        /// The most recently committed timestep.
        last: Timestep,
    },
}

impl fmt::Display for CommitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate { timestep } => {
                write!(f, "timestep {timestep} already committed")
            }
            Self::OutOfOrder { requested, last } => {
                write!(
                    f,
                    "timestep {requested} precedes last committed timestep {last}"
                )
            }
        }
    }
}

impl Error for CommitError {}

/// Errors from the fetch family of operations.
///
/// [`NotYetAvailable`](Self::NotYetAvailable),
/// [`Timeout`](Self::Timeout) and [`NoExactFrame`](Self::NoExactFrame)
/// reflect timing skew between independently stepped simulations and
/// are recoverable by retrying later.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchError {
    /// Some peer has not yet committed a frame at or beyond the
    /// requested time.
    NotYetAvailable {
        /// The requested timestep.
        requested: Timestep,
        /// The lowest timestep committed by every peer, if any.
        horizon: Option<Timestep>,
    },
    /// The fetch deadline expired before every peer reached the
    /// requested time.
    Timeout {
        /// The requested timestep.
        requested: Timestep,
    },
    /// The requested time can never become ready: the interface has no
    /// peers, or a peer closed before reaching it.
    Disconnected {
        /// The requested timestep.
        requested: Timestep,
    },
    /// The exact temporal sampler found no frame at the requested time.
    NoExactFrame {
        /// The requested timestep.
        requested: Timestep,
    },
    /// The spatial sampler found no pushed point matching the query.
    NoMatchingPoint {
        /// The tag that was sampled.
        tag: String,
        /// The query point.
        point: Point,
    },
    /// The query point's dimensionality disagrees with the interface.
    DimensionMismatch {
        /// Dimensionality configured on the interface.
        expected: usize,
        /// Dimensionality of the query point.
        got: usize,
    },
}

impl FetchError {
    /// Whether retrying the same fetch later can succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NotYetAvailable { .. } | Self::Timeout { .. } | Self::NoExactFrame { .. }
        )
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotYetAvailable { requested, horizon } => {
                write!(f, "timestep {requested} not yet available")?;
                if let Some(h) = horizon {
                    write!(f, " (peers committed up to {h})")?;
                }
                Ok(())
            }
            Self::Timeout { requested } => {
                write!(f, "timed out waiting for timestep {requested}")
            }
            Self::Disconnected { requested } => {
                write!(f, "timestep {requested} unreachable: peers disconnected or absent")
            }
            Self::NoExactFrame { requested } => {
                write!(f, "no frame committed at exactly timestep {requested}")
            }
            Self::NoMatchingPoint { tag, point } => {
                write!(f, "no value under tag '{tag}' matches point {point}")
            }
            Self::DimensionMismatch { expected, got } => {
                write!(f, "query point has {got} dimensions, interface expects {expected}")
            }
        }
    }
}

impl Error for FetchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        let t = Timestep(4);
        assert!(FetchError::NotYetAvailable {
            requested: t,
            horizon: None
        }
        .is_transient());
        assert!(FetchError::Timeout { requested: t }.is_transient());
        assert!(FetchError::NoExactFrame { requested: t }.is_transient());
        assert!(!FetchError::Disconnected { requested: t }.is_transient());
        assert!(!FetchError::DimensionMismatch {
            expected: 2,
            got: 3
        }
        .is_transient());
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            CommitError::Duplicate {
                timestep: Timestep(0)
            }
            .to_string(),
            "timestep 0 already committed"
        );
        assert_eq!(
            FetchError::NotYetAvailable {
                requested: Timestep(3),
                horizon: Some(Timestep(1)),
            }
            .to_string(),
            "timestep 3 not yet available (peers committed up to 1)"
        );
        assert_eq!(
            FetchError::NoMatchingPoint {
                tag: "temp".into(),
                point: Point::from([1.0, 2.0]),
            }
            .to_string(),
            "no value under tag 'temp' matches point (1, 2)"
        );
    }
}
