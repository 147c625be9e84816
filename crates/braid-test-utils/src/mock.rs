//! A scripted [`Link`] for driving one interface without a real peer.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use braid_core::Rank;
use braid_frame::CommitFrame;
use braid_transport::{Envelope, Link, RecvError};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};

/// A [`Link`] whose inbox is fed by a [`MockPeer`].
///
/// Published frames are recorded instead of delivered. Dropping the
/// `MockPeer` disconnects the inbox.
pub struct MockLink {
    channel: String,
    rank: Rank,
    peers: Vec<Rank>,
    inbox: Receiver<Envelope>,
    published: Arc<Mutex<Vec<Arc<CommitFrame>>>>,
}

/// The test's handle on a [`MockLink`].
pub struct MockPeer {
    tx: Sender<Envelope>,
    published: Arc<Mutex<Vec<Arc<CommitFrame>>>>,
}

impl MockLink {
    /// A link on `channel` owned by `rank`, claiming `peers`.
    pub fn new(channel: &str, rank: Rank, peers: &[Rank]) -> (MockLink, MockPeer) {
        let (tx, inbox) = crossbeam_channel::unbounded();
        let published = Arc::new(Mutex::new(Vec::new()));
        let link = MockLink {
            channel: channel.to_owned(),
            rank,
            peers: peers.to_vec(),
            inbox,
            published: Arc::clone(&published),
        };
        (link, MockPeer { tx, published })
    }
}

impl MockPeer {
    /// Deliver `frame` as if a peer had committed it.
    pub fn send(&self, frame: Arc<CommitFrame>) {
        let _ = self.tx.send(Envelope::Frame(frame));
    }

    /// Announce that `from` has closed its end.
    pub fn close(&self, from: Rank) {
        let _ = self.tx.send(Envelope::Closed { from });
    }

    /// Frames the link has published so far, in order.
    pub fn published(&self) -> Vec<Arc<CommitFrame>> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Link for MockLink {
    fn channel(&self) -> &str {
        &self.channel
    }

    fn rank(&self) -> Rank {
        self.rank
    }

    fn peers(&self) -> &[Rank] {
        &self.peers
    }

    fn publish(&self, frame: Arc<CommitFrame>) -> usize {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(frame);
        self.peers.len()
    }

    fn try_recv(&self) -> Result<Option<Envelope>, RecvError> {
        match self.inbox.try_recv() {
            Ok(env) => Ok(Some(env)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(RecvError::Disconnected),
        }
    }

    fn recv_deadline(&self, deadline: Option<Instant>) -> Result<Envelope, RecvError> {
        match deadline {
            Some(d) => self.inbox.recv_deadline(d).map_err(|e| match e {
                RecvTimeoutError::Timeout => RecvError::Timeout,
                RecvTimeoutError::Disconnected => RecvError::Disconnected,
            }),
            None => self.inbox.recv().map_err(|_| RecvError::Disconnected),
        }
    }
}
