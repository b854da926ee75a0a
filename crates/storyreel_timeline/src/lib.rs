// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline composition and playback primitives for `StoryReel`.
//!
//! One scene owns an ordered list of trimmed media clips ([`Footage`]) and a
//! set of time-bounded interactive overlays ([`Node`]). This crate:
//! - composes the footage list into one continuous, seekable timeline
//!   ([`compose`]), a pure function recomputed on every edit
//! - answers "which nodes are active at time t" without allocating in
//!   steady state ([`ActiveNodeSet`])
//! - drives the playback clock state machine ([`Transport`])
//!
//! Rendering, decoding and asset I/O stay outside; collaborators consume the
//! composed timeline through their own contracts.

pub mod composition;
pub mod footage;
pub mod node;
pub mod playback;

pub use composition::{compose, compose_partial, ComposedTimeline, Segment};
pub use footage::{
    CompositionError, Footage, FootageId, FootageKind, MediaAssetRef, MIN_FOOTAGE_DURATION,
};
pub use node::{ActiveNodeSet, Node, NodeId, NodeKind, Rule};
pub use playback::{PlaybackState, Transport, TransportEvent};
