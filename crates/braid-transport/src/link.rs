//! The [`Transport`] and [`Link`] traits.

use std::sync::Arc;
use std::time::Instant;

use braid_core::Rank;
use braid_frame::CommitFrame;

use crate::error::{RecvError, TransportError};
use crate::partition::Partition;

/// A message arriving on a link.
#[derive(Clone, Debug)]
pub enum Envelope {
    /// A peer committed a frame.
    Frame(Arc<CommitFrame>),
    /// A peer dropped its end of the channel; it will commit nothing more.
    Closed {
        /// The departing peer.
        from: Rank,
    },
}

/// Channel setup for a coupled run.
///
/// Implementations bind channels by name: every rank that opens a
/// channel with the same name becomes a peer on it.
pub trait Transport: Send + Sync {
    /// Open `channels` for the rank described by `partition`.
    ///
    /// Collective: every rank of the world must call `open` exactly once
    /// per setup round, otherwise callers may block forever. Returns one
    /// link per channel, in the order requested.
    ///
    /// An invalid request on any rank fails the whole round: that rank
    /// gets its own error and every other rank gets
    /// [`TransportError::PeerSetupFailed`]. A rank that does not belong
    /// to the transport's world is rejected immediately and does not
    /// take part in the round.
    fn open(
        &self,
        partition: &Partition,
        run: &str,
        channels: &[String],
    ) -> Result<Vec<Box<dyn Link>>, TransportError>;
}

/// One rank's endpoint on a named channel.
///
/// Frames published by a given peer arrive in the order that peer
/// committed them.
pub trait Link: Send {
    /// The channel name.
    fn channel(&self) -> &str;

    /// The rank owning this endpoint.
    fn rank(&self) -> Rank;

    /// Other ranks on the channel, ascending.
    fn peers(&self) -> &[Rank];

    /// Send a committed frame to every peer.
    ///
    /// Returns the number of peers the frame was delivered to. A peer
    /// that has gone away is skipped, not treated as an error: it can no
    /// longer fetch, so nothing is lost.
    fn publish(&self, frame: Arc<CommitFrame>) -> usize;

    /// Receive one pending message without blocking.
    fn try_recv(&self) -> Result<Option<Envelope>, RecvError>;

    /// Block for the next message until `deadline`, or indefinitely
    /// when `deadline` is `None`.
    fn recv_deadline(&self, deadline: Option<Instant>) -> Result<Envelope, RecvError>;
}
