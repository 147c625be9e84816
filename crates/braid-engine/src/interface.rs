//! The [`Interface`]: one rank's endpoint on a named coupling channel.
//!
//! Push is local and cheap; commit is the synchronization boundary that
//! turns the push buffer into an immutable frame and publishes it; fetch
//! reads only frames peers have committed, never a partial buffer.

use std::sync::Arc;
use std::time::{Duration, Instant};

use braid_core::{CommitError, FetchError, Point, PushError, Rank, Timestep};
use braid_frame::{CommitFrame, FrameHistory, FrameStore, PushBuffer};
use braid_sampler::{SpatialSampler, TemporalSampler};
use braid_transport::{Envelope, Link, RecvError};

use crate::config::InterfaceConfig;

/// How long a fetch may block waiting for peers to reach the requested
/// time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Wait {
    /// Return [`FetchError::NotYetAvailable`] immediately.
    #[default]
    Never,
    /// Block up to the given duration, then return
    /// [`FetchError::Timeout`].
    For(Duration),
    /// Block until every peer reaches the requested time or disconnects.
    Forever,
}

/// One rank's endpoint on a named coupling channel.
///
/// Single writer: one interface is driven by one thread. The push
/// buffer never leaves this struct; committed frames are shared with
/// peers as `Arc<CommitFrame>`.
pub struct Interface {
    name: String,
    run: String,
    buffer: PushBuffer,
    history: FrameHistory,
    store: FrameStore,
    /// Peers that announced they will commit nothing more.
    closed: Vec<Rank>,
    /// Set once the link reports every sender gone.
    inbox_disconnected: bool,
    link: Box<dyn Link>,
}

// Compile-time assertion: an Interface can be moved to its rank's thread.
const _: fn() = || {
    fn assert<T: Send>() {}
    assert::<Interface>();
};

impl Interface {
    /// Bind a new interface to `link`.
    ///
    /// `config` must already be validated.
    pub(crate) fn new(run: &str, config: &InterfaceConfig, link: Box<dyn Link>) -> Self {
        Self {
            name: link.channel().to_owned(),
            run: run.to_owned(),
            buffer: PushBuffer::new(config.dimensions),
            history: FrameHistory::new(config.history_capacity),
            store: FrameStore::new(link.peers(), config.received_capacity),
            closed: Vec::new(),
            inbox_disconnected: false,
            link,
        }
    }

    // ── Identity ────────────────────────────────────────────────

    /// The channel name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The coupled-run name this interface was created under.
    pub fn run(&self) -> &str {
        &self.run
    }

    /// `braid://{run}/{name}`, for diagnostics.
    pub fn uri(&self) -> String {
        format!("braid://{}/{}", self.run, self.name)
    }

    /// The rank owning this interface.
    pub fn rank(&self) -> Rank {
        self.link.rank()
    }

    /// Other ranks on this channel.
    pub fn peers(&self) -> &[Rank] {
        self.link.peers()
    }

    /// Coordinates per point.
    pub fn dimensions(&self) -> usize {
        self.buffer.dimensions()
    }

    // ── Push / commit ───────────────────────────────────────────

    /// Buffer `value` at `point` under `tag` for the next commit.
    ///
    /// The tag is created on first use. Nothing is visible to peers
    /// until [`commit`](Self::commit).
    pub fn push(&mut self, tag: &str, point: impl Into<Point>, value: f64) -> Result<(), PushError> {
        self.buffer.push(tag, point.into(), value)
    }

    /// Buffer `values[i]` at `points[i]` under `tag`; all or nothing.
    pub fn push_many(&mut self, tag: &str, points: &[Point], values: &[f64]) -> Result<(), PushError> {
        self.buffer.push_many(tag, points, values)
    }

    /// Number of values pushed since the last commit.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Publish everything pushed since the last commit as the frame at
    /// `timestep`.
    ///
    /// Returns the number of values in the frame. An empty buffer still
    /// commits, advancing peers' view of this rank's time. On error the
    /// buffer and history are untouched.
    pub fn commit(&mut self, timestep: impl Into<Timestep>) -> Result<usize, CommitError> {
        let timestep = timestep.into();
        self.history.check_next(timestep)?;

        let frame = Arc::new(self.buffer.take_frame(timestep, self.link.rank()));
        let len = frame.len();
        if let Some(evicted) = self.history.append(Arc::clone(&frame))? {
            log::trace!("{}: evicted local frame {}", self.uri(), evicted.timestep());
        }

        let delivered = self.link.publish(frame);
        log::debug!(
            "{}: committed {len} value(s) at timestep {timestep} to {delivered} peer(s)",
            self.uri()
        );
        Ok(len)
    }

    /// The most recently committed timestep.
    pub fn last_committed(&self) -> Option<Timestep> {
        self.history.last_committed()
    }

    /// This interface's own frame at `timestep`, if retained.
    pub fn frame(&self, timestep: impl Into<Timestep>) -> Option<&Arc<CommitFrame>> {
        self.history.get(timestep.into())
    }

    /// This interface's retained frames, oldest first.
    pub fn frames(&self) -> impl Iterator<Item = &Arc<CommitFrame>> {
        self.history.iter()
    }

    // ── Fetch ───────────────────────────────────────────────────

    /// Sample `tag` at `point` from peer frames selected at `time`.
    pub fn fetch(
        &mut self,
        tag: &str,
        point: &Point,
        time: impl Into<Timestep>,
        spatial: SpatialSampler,
        temporal: TemporalSampler,
        wait: Wait,
    ) -> Result<f64, FetchError> {
        let time = time.into();
        self.check_query(point)?;
        self.await_time(time, wait)?;
        let frames = temporal.select(time, &self.store)?;
        spatial.sample(tag, point, frames)
    }

    /// Sample `tag` at each of `points`; fails on the first miss.
    pub fn fetch_many(
        &mut self,
        tag: &str,
        points: &[Point],
        time: impl Into<Timestep>,
        spatial: SpatialSampler,
        temporal: TemporalSampler,
        wait: Wait,
    ) -> Result<Vec<f64>, FetchError> {
        let time = time.into();
        for point in points {
            self.check_query(point)?;
        }
        self.await_time(time, wait)?;
        let frames = temporal.select(time, &self.store)?;
        points
            .iter()
            .map(|p| spatial.sample(tag, p, frames))
            .collect()
    }

    /// Every value committed under `tag` in the frames selected at
    /// `time`, by origin rank then push order.
    pub fn fetch_values(
        &mut self,
        tag: &str,
        time: impl Into<Timestep>,
        temporal: TemporalSampler,
        wait: Wait,
    ) -> Result<Vec<f64>, FetchError> {
        let time = time.into();
        self.await_time(time, wait)?;
        let frames = temporal.select(time, &self.store)?;
        Ok(frames
            .iter()
            .flat_map(|f| f.tag(tag))
            .map(|tv| tv.value)
            .collect())
    }

    /// The source points of [`fetch_values`](Self::fetch_values), in the
    /// same order.
    pub fn fetch_points(
        &mut self,
        tag: &str,
        time: impl Into<Timestep>,
        temporal: TemporalSampler,
        wait: Wait,
    ) -> Result<Vec<Point>, FetchError> {
        let time = time.into();
        self.await_time(time, wait)?;
        let frames = temporal.select(time, &self.store)?;
        Ok(frames
            .iter()
            .flat_map(|f| f.tag(tag))
            .map(|tv| tv.point.clone())
            .collect())
    }

    /// Drop local and received frames with timestep `<= upto`.
    ///
    /// Commit ordering is still enforced against forgotten timesteps.
    pub fn forget(&mut self, upto: impl Into<Timestep>) {
        let upto = upto.into();
        self.drain();
        let received = self.store.forget(upto);
        let local = self.history.forget(upto);
        log::debug!(
            "{}: forgot {received} received and {local} local frame(s) up to {upto}",
            self.uri()
        );
    }

    /// Timesteps with received peer frames, ascending.
    pub fn received_timesteps(&mut self) -> Vec<Timestep> {
        self.drain();
        self.store.timesteps().collect()
    }

    /// The latest timestep `peer` has committed, as far as received.
    pub fn peer_horizon(&mut self, peer: Rank) -> Option<Timestep> {
        self.drain();
        self.store.peer_horizon(peer)
    }

    /// The lowest timestep every peer has committed, as far as received.
    pub fn horizon(&mut self) -> Option<Timestep> {
        self.drain();
        self.store.horizon()
    }

    // ── Internals ───────────────────────────────────────────────

    fn check_query(&self, point: &Point) -> Result<(), FetchError> {
        if point.dims() != self.dimensions() {
            return Err(FetchError::DimensionMismatch {
                expected: self.dimensions(),
                got: point.dims(),
            });
        }
        Ok(())
    }

    /// Block per `wait` until every peer has committed at or beyond `time`.
    fn await_time(&mut self, time: Timestep, wait: Wait) -> Result<(), FetchError> {
        // A deadline too far out to represent waits forever.
        let deadline = match wait {
            Wait::For(d) => Instant::now().checked_add(d),
            Wait::Never | Wait::Forever => None,
        };
        loop {
            self.drain();
            if self.store.is_ready(time) {
                return Ok(());
            }
            if self.unreachable(time) {
                return Err(FetchError::Disconnected { requested: time });
            }
            if wait == Wait::Never {
                return Err(FetchError::NotYetAvailable {
                    requested: time,
                    horizon: self.store.horizon(),
                });
            }
            match self.link.recv_deadline(deadline) {
                Ok(envelope) => self.absorb(envelope),
                Err(RecvError::Timeout) => {
                    return Err(FetchError::Timeout { requested: time });
                }
                Err(RecvError::Disconnected) => self.inbox_disconnected = true,
            }
        }
    }

    /// Whether no peer message can ever make `time` ready.
    fn unreachable(&self, time: Timestep) -> bool {
        if self.inbox_disconnected || self.peers().is_empty() {
            return true;
        }
        self.closed
            .iter()
            .any(|&peer| self.store.peer_horizon(peer).map_or(true, |h| h < time))
    }

    /// Move every pending message from the link into the store.
    fn drain(&mut self) {
        if self.inbox_disconnected {
            return;
        }
        loop {
            match self.link.try_recv() {
                Ok(Some(envelope)) => self.absorb(envelope),
                Ok(None) => break,
                Err(RecvError::Disconnected) => {
                    self.inbox_disconnected = true;
                    break;
                }
                Err(RecvError::Timeout) => break,
            }
        }
    }

    fn absorb(&mut self, envelope: Envelope) {
        match envelope {
            Envelope::Frame(frame) => {
                log::trace!(
                    "{}: received timestep {} from rank {} ({} value(s))",
                    self.uri(),
                    frame.timestep(),
                    frame.origin(),
                    frame.len()
                );
                let evicted = self.store.insert(frame);
                if evicted > 0 {
                    log::trace!("{}: evicted {evicted} received timestep(s)", self.uri());
                }
            }
            Envelope::Closed { from } => {
                log::debug!("{}: peer {from} closed", self.uri());
                if !self.closed.contains(&from) {
                    self.closed.push(from);
                }
            }
        }
    }
}

impl std::fmt::Debug for Interface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interface")
            .field("name", &self.name)
            .field("run", &self.run)
            .field("rank", &self.link.rank())
            .field("peers", &self.link.peers())
            .field("pending", &self.buffer.len())
            .field("last_committed", &self.history.last_committed())
            .finish()
    }
}
