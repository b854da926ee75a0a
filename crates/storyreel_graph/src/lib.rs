// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene graph and sensor/condition engine for `StoryReel`.
//!
//! A work is a directed graph of scenes. Edges (transitions) are guarded by
//! conditions over runtime sensor state and fire during playback when their
//! guard evaluates true.
//!
//! ## Architecture
//!
//! The crate is split into two independent halves:
//! - Sensor/condition engine: typed runtime state plus boolean guard
//!   evaluation, with no knowledge of scenes or timelines
//! - Scene graph: scenes and condition-guarded transitions, resolved
//!   first-match-wins against a [`RuntimeState`]

pub mod condition;
pub mod graph;
pub mod scene;
pub mod sensor;
pub mod transition;

pub use condition::{Condition, Operator, RuntimeState};
pub use graph::{GraphError, StoryGraph};
pub use scene::{Scene, SceneId, SceneIndex};
pub use sensor::{Sensor, SensorKey, SensorScope, Value};
pub use transition::Transition;
