// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sensor addressing and typed runtime values.
//!
//! A sensor is an address for a piece of runtime state, not a value. Scoped
//! addressing lets conditions reference signals anywhere in the authored
//! graph, not just the local scene.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scope a sensor belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorScope {
    /// Global, work-wide state
    Game,
    /// State owned by one scene, keyed by the scene's UUID
    Scene(Uuid),
    /// State owned by one interactive node, keyed by the node's UUID
    Node(Uuid),
}

/// Sensor key.
///
/// Open enumeration: engine-defined signals get their own variant, anything
/// else rides in [`SensorKey::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorKey {
    /// Playback clock signal (the synchronizer writes `"end"` on scene end)
    TimeControl,
    /// Node interaction signal, written when a node's rule fires
    Interaction,
    /// Author-defined signal
    Custom(String),
}

/// Address of a piece of runtime state
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sensor {
    /// Scope the sensor lives in
    pub scope: SensorScope,
    /// Key within the scope
    pub key: SensorKey,
}

impl Sensor {
    /// Create a sensor address
    pub fn new(scope: SensorScope, key: SensorKey) -> Self {
        Self { scope, key }
    }

    /// Game-scoped sensor
    pub fn game(key: SensorKey) -> Self {
        Self::new(SensorScope::Game, key)
    }

    /// Scene-scoped sensor
    pub fn scene(scene: Uuid, key: SensorKey) -> Self {
        Self::new(SensorScope::Scene(scene), key)
    }

    /// Node-scoped sensor
    pub fn node(node: Uuid, key: SensorKey) -> Self {
        Self::new(SensorScope::Node(node), key)
    }
}

/// Typed sensor value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// Text value
    Text(String),
    /// Integer value
    Integer(i64),
    /// Boolean flag
    Flag(bool),
}

impl Value {
    /// Text value from anything string-like
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Integer value, if this is one
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}
