//! In-process transport: one thread per simulated rank.
//!
//! Each `(channel, rank)` pair owns an unbounded crossbeam inbox. `open`
//! runs in three phases separated by a world-wide barrier:
//!
//! ```text
//! register own inbox senders ─┐
//!                             ├─ barrier ─ clone peer senders ─┐
//!                             │                                ├─ barrier ─ unregister own senders
//! ```
//!
//! Once every rank has unregistered, the only senders into an inbox are
//! held by peer links, so an inbox disconnects exactly when all of its
//! peers have dropped their links.
//!
//! A rank whose request is invalid still takes part in every barrier. It
//! records itself as failed before the first barrier, and every rank of
//! the round then fails together instead of waiting on it forever.

use std::collections::HashMap;
use std::sync::{Arc, Barrier, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use braid_core::Rank;
use braid_frame::CommitFrame;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use indexmap::IndexMap;

use crate::error::{RecvError, TransportError};
use crate::link::{Envelope, Link, Transport};
use crate::partition::Partition;

#[derive(Default)]
struct Registry {
    channels: HashMap<String, IndexMap<Rank, Sender<Envelope>>>,
    /// Ranks whose request failed validation in the current round.
    failed: Vec<Rank>,
}

/// In-process [`Transport`] shared by all simulated ranks.
///
/// Wrap in an `Arc` and hand a clone to each rank's thread.
pub struct LocalBus {
    world_size: usize,
    barrier: Barrier,
    registry: Mutex<Registry>,
}

// Compile-time assertion: LocalBus must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<LocalBus>();
};

impl LocalBus {
    /// Create a bus for a world of `world_size` ranks.
    ///
    /// # Panics
    ///
    /// Panics if `world_size` is zero.
    pub fn new(world_size: usize) -> Self {
        assert!(world_size >= 1, "LocalBus world_size must be >= 1, got {world_size}");
        Self {
            world_size,
            barrier: Barrier::new(world_size),
            registry: Mutex::new(Registry::default()),
        }
    }

    /// Number of ranks this bus connects.
    pub fn world_size(&self) -> usize {
        self.world_size
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        // The registry holds only channel senders and rank ids; a panic elsewhere
        // cannot leave it half-updated.
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn validate(&self, partition: &Partition, channels: &[String]) -> Result<(), TransportError> {
        if partition.rank().0 as usize >= self.world_size {
            return Err(TransportError::RankOutOfRange {
                rank: partition.rank(),
                world_size: self.world_size,
            });
        }
        for (i, name) in channels.iter().enumerate() {
            if channels[..i].contains(name) {
                return Err(TransportError::DuplicateChannel { name: name.clone() });
            }
        }
        Ok(())
    }
}

impl Transport for LocalBus {
    fn open(
        &self,
        partition: &Partition,
        run: &str,
        channels: &[String],
    ) -> Result<Vec<Box<dyn Link>>, TransportError> {
        // A partition of another world cannot be counted by this bus's
        // barriers, so it is rejected without joining them.
        if partition.world_size() != self.world_size {
            return Err(TransportError::WorldSizeMismatch {
                expected: self.world_size,
                got: partition.world_size(),
            });
        }
        let rank = partition.rank();
        let checked = self.validate(partition, channels);

        let inboxes: Vec<Receiver<Envelope>> = {
            let mut registry = self.registry();
            if checked.is_ok() {
                channels
                    .iter()
                    .map(|name| {
                        let (tx, rx) = crossbeam_channel::unbounded();
                        registry
                            .channels
                            .entry(name.clone())
                            .or_default()
                            .insert(rank, tx);
                        rx
                    })
                    .collect()
            } else {
                registry.failed.push(rank);
                Vec::new()
            }
        };

        self.barrier.wait();

        let failed = self.registry().failed.first().copied();
        let links: Vec<Box<dyn Link>> = if failed.is_none() {
            let registry = self.registry();
            channels
                .iter()
                .zip(inboxes)
                .map(|(name, inbox)| {
                    let mut outbox: Vec<(Rank, Sender<Envelope>)> = registry
                        .channels
                        .get(name)
                        .into_iter()
                        .flat_map(|members| members.iter())
                        .filter(|&(&peer, _)| peer != rank)
                        .map(|(&peer, tx)| (peer, tx.clone()))
                        .collect();
                    outbox.sort_by_key(|(peer, _)| *peer);
                    log::info!(
                        "braid://{run}/{name}: rank {rank} ({}) linked to {} peer(s)",
                        partition.app(),
                        outbox.len()
                    );
                    Box::new(LocalLink::new(name.clone(), rank, outbox, inbox)) as Box<dyn Link>
                })
                .collect()
        } else {
            Vec::new()
        };

        self.barrier.wait();

        {
            let mut registry = self.registry();
            if checked.is_ok() {
                for name in channels {
                    if let Some(members) = registry.channels.get_mut(name) {
                        members.shift_remove(&rank);
                        if members.is_empty() {
                            registry.channels.remove(name);
                        }
                    }
                }
            }
            registry.failed.retain(|&r| r != rank);
        }

        checked?;
        if let Some(peer) = failed {
            log::warn!("braid://{run}: rank {rank} aborting setup, rank {peer} failed");
            return Err(TransportError::PeerSetupFailed { rank: peer });
        }
        Ok(links)
    }
}

/// A [`LocalBus`] endpoint.
///
/// Dropping the link tells every peer it has closed.
pub struct LocalLink {
    channel: String,
    rank: Rank,
    peers: Vec<Rank>,
    outbox: Vec<Sender<Envelope>>,
    inbox: Receiver<Envelope>,
}

impl LocalLink {
    fn new(
        channel: String,
        rank: Rank,
        outbox: Vec<(Rank, Sender<Envelope>)>,
        inbox: Receiver<Envelope>,
    ) -> Self {
        let (peers, outbox) = outbox.into_iter().unzip();
        Self {
            channel,
            rank,
            peers,
            outbox,
            inbox,
        }
    }
}

impl Link for LocalLink {
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
        let mut delivered = 0;
        for (peer, tx) in self.peers.iter().zip(&self.outbox) {
            if tx.send(Envelope::Frame(Arc::clone(&frame))).is_ok() {
                delivered += 1;
            } else {
                log::warn!(
                    "{}: peer {peer} is gone, frame at timestep {} not delivered",
                    self.channel,
                    frame.timestep()
                );
            }
        }
        delivered
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
            Some(deadline) => self.inbox.recv_deadline(deadline).map_err(|e| match e {
                RecvTimeoutError::Timeout => RecvError::Timeout,
                RecvTimeoutError::Disconnected => RecvError::Disconnected,
            }),
            None => self.inbox.recv().map_err(|_| RecvError::Disconnected),
        }
    }
}

impl Drop for LocalLink {
    fn drop(&mut self) {
        for tx in &self.outbox {
            let _ = tx.send(Envelope::Closed { from: self.rank });
        }
    }
}
