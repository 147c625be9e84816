//! Push buffers and immutable commit frames.
//!
//! Values flow through three stages:
//!
//! ```text
//! push(tag, point, value)          commit(t)                 peers
//!        │                             │                        │
//!        ▼                             ▼                        ▼
//!   PushBuffer ──── take_frame ──► Arc<CommitFrame> ──► FrameStore (remote view)
//!  (single writer)                     │
//!                                      └──► FrameHistory (local view)
//! ```
//!
//! A [`PushBuffer`] is mutable and owned by exactly one interface. A
//! [`CommitFrame`] is immutable once built and is shared by `Arc` with
//! the local [`FrameHistory`] and with every peer's [`FrameStore`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod frame;
pub mod history;
pub mod store;
pub mod value;

pub use buffer::PushBuffer;
pub use frame::CommitFrame;
pub use history::FrameHistory;
pub use store::FrameStore;
pub use value::TaggedValue;
