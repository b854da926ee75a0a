// SPDX-License-Identifier: MIT OR Apache-2.0
//! Transition (edge) definitions for the story graph.

use crate::condition::{Condition, RuntimeState};
use crate::scene::SceneIndex;
use serde::{Deserialize, Serialize};

/// A directed, condition-guarded edge between two scenes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    /// Source scene index
    pub from: SceneIndex,
    /// Target scene index
    pub to: SceneIndex,
    /// Guard conditions; the transition fires when any one is true
    pub conditions: Vec<Condition>,
}

impl Transition {
    /// Create a new transition
    pub fn new(from: SceneIndex, to: SceneIndex, conditions: Vec<Condition>) -> Self {
        Self {
            from,
            to,
            conditions,
        }
    }

    /// Check if this transition involves a specific scene
    pub fn involves_scene(&self, index: SceneIndex) -> bool {
        self.from == index || self.to == index
    }

    /// Whether the guard holds: OR across conditions.
    ///
    /// An empty condition list never fires.
    pub fn is_satisfied(&self, state: &RuntimeState) -> bool {
        self.conditions.iter().any(|c| state.evaluate(c))
    }
}
