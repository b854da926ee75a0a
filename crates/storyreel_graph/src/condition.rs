// SPDX-License-Identifier: MIT OR Apache-2.0
//! Guard conditions and runtime sensor state.
//!
//! Guard evaluation is total over partial runtime state: a condition whose
//! sensor has never been written evaluates to `false`, never to an error.

use crate::sensor::{Sensor, SensorScope, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comparison operator for conditions.
///
/// Closed set; ordering operators compare [`Value::Integer`] only and are
/// `false` for any other pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    /// Values are equal
    EqualTo,
    /// Values differ
    NotEqualTo,
    /// Sensor value is numerically less than the literal
    LessThan,
    /// Sensor value is numerically greater than the literal
    GreaterThan,
}

impl Operator {
    /// Compare a sensor's current value against a condition literal
    pub fn compare(self, actual: &Value, expected: &Value) -> bool {
        match self {
            Self::EqualTo => actual == expected,
            Self::NotEqualTo => actual != expected,
            Self::LessThan => match (actual.as_integer(), expected.as_integer()) {
                (Some(a), Some(b)) => a < b,
                _ => false,
            },
            Self::GreaterThan => match (actual.as_integer(), expected.as_integer()) {
                (Some(a), Some(b)) => a > b,
                _ => false,
            },
        }
    }
}

/// A pure predicate comparing a sensor's current value against a literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Sensor address to read
    pub sensor: Sensor,
    /// Comparison operator
    pub operator: Operator,
    /// Literal to compare against
    pub value: Value,
}

impl Condition {
    /// Create a condition
    pub fn new(sensor: Sensor, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            sensor,
            operator,
            value: value.into(),
        }
    }

    /// Equality condition, the common authoring case
    pub fn equals(sensor: Sensor, value: impl Into<Value>) -> Self {
        Self::new(sensor, Operator::EqualTo, value)
    }
}

/// Runtime sensor state: a typed mapping from sensor address to value.
///
/// Has no knowledge of scenes or timelines; mutation is single-writer by
/// caller discipline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeState {
    values: IndexMap<Sensor, Value>,
}

impl RuntimeState {
    /// Create an empty runtime state
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a sensor value, replacing any previous value
    pub fn set(&mut self, sensor: Sensor, value: impl Into<Value>) {
        self.values.insert(sensor, value.into());
    }

    /// Read a sensor value
    pub fn get(&self, sensor: &Sensor) -> Option<&Value> {
        self.values.get(sensor)
    }

    /// Remove a single sensor value
    pub fn remove(&mut self, sensor: &Sensor) -> Option<Value> {
        self.values.swap_remove(sensor)
    }

    /// Drop every sensor scoped to the given scene, including node scopes
    /// passed in `nodes`. Called when playback enters a new scene so stale
    /// per-scene signals cannot satisfy the next scene's guards.
    pub fn clear_scene_scope(&mut self, scene: Uuid, nodes: &[Uuid]) {
        self.values.retain(|sensor, _| match sensor.scope {
            SensorScope::Scene(s) => s != scene,
            SensorScope::Node(n) => !nodes.contains(&n),
            SensorScope::Game => true,
        });
    }

    /// Clear all sensor state
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of sensors currently set
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no sensor has been written
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Evaluate a condition against the current state.
    ///
    /// A missing sensor evaluates to `false`.
    pub fn evaluate(&self, condition: &Condition) -> bool {
        match self.get(&condition.sensor) {
            Some(actual) => condition.operator.compare(actual, &condition.value),
            None => false,
        }
    }
}
