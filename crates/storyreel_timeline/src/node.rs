// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interactive overlay nodes placed on a scene's timeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use storyreel_graph::{SensorKey, Value};
use uuid::Uuid;

/// Unique identifier for an interactive node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Kind of interactive overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Tappable button
    Button,
    /// Invisible tappable region
    Hotspot,
    /// Text label overlay
    Label,
    /// Author-defined overlay behavior
    Custom(String),
}

/// Parameters that make a node act as a sensor source.
///
/// When the node is interacted with during playback, `value` is written
/// into the node-scoped sensor under `key`. Node-behavior semantics beyond
/// this generic binding are deliberately not modeled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Sensor key the interaction writes under
    pub key: SensorKey,
    /// Value written on interaction
    pub value: Value,
}

/// A time-bounded interactive overlay within a scene.
///
/// Active over `[start_time, start_time + duration)`. Nodes may overlap in
/// time; precedence between overlapping nodes is a rendering concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique node ID
    pub id: NodeId,
    /// Stable per-scene index; monotonic, never reused
    pub index: u32,
    /// Overlay kind
    pub kind: NodeKind,
    /// Start of the active interval
    pub start_time: Duration,
    /// Length of the active interval
    pub duration: Duration,
    /// Optional sensor-source binding
    pub rule: Option<Rule>,
}

impl Node {
    /// Create a node active from `start_time` for `duration`
    pub fn new(index: u32, kind: NodeKind, start_time: Duration, duration: Duration) -> Self {
        Self {
            id: NodeId::new(),
            index,
            kind,
            start_time,
            duration,
            rule: None,
        }
    }

    /// Attach a sensor-source rule
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rule = Some(rule);
        self
    }

    /// End of the active interval (exclusive)
    pub fn end_time(&self) -> Duration {
        self.start_time.saturating_add(self.duration)
    }

    /// Whether `time` falls inside the active interval
    pub fn active_at(&self, time: Duration) -> bool {
        time >= self.start_time && time < self.end_time()
    }

    /// Move/resize the active interval (trim-expand edit)
    pub fn set_window(&mut self, start_time: Duration, duration: Duration) {
        self.start_time = start_time;
        self.duration = duration;
    }
}

/// Reusable query for the set of nodes active at a time.
///
/// [`ActiveNodeSet::update`] runs once per clock tick during playback, so
/// it refills a retained buffer instead of allocating per call.
#[derive(Debug, Default)]
pub struct ActiveNodeSet {
    active: Vec<NodeId>,
}

impl ActiveNodeSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the active set for `time`.
    ///
    /// All nodes whose interval contains `time` are returned, in list
    /// order; overlapping nodes carry no precedence here.
    pub fn update(&mut self, nodes: &[Node], time: Duration) -> &[NodeId] {
        self.active.clear();
        self.active
            .extend(nodes.iter().filter(|n| n.active_at(time)).map(|n| n.id));
        &self.active
    }

    /// Currently active node IDs, from the last `update`
    pub fn ids(&self) -> &[NodeId] {
        &self.active
    }

    /// Whether a node was active at the last `update`
    pub fn contains(&self, id: NodeId) -> bool {
        self.active.contains(&id)
    }

    /// Number of active nodes from the last `update`
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no node was active at the last `update`
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
