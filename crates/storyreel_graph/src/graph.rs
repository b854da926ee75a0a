// SPDX-License-Identifier: MIT OR Apache-2.0
//! Story graph: scenes plus condition-guarded transitions.

use crate::condition::{Condition, RuntimeState};
use crate::scene::{Scene, SceneId, SceneIndex};
use crate::transition::Transition;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The authored graph of one work.
///
/// Owns scenes and transitions; the per-scene media and node bundles are
/// owned externally and keyed by [`SceneId`]. Scene indices are assigned
/// monotonically and never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryGraph {
    /// Work title
    pub title: String,
    /// Scenes by stable index
    scenes: IndexMap<SceneIndex, Scene>,
    /// Transitions in creation order
    transitions: Vec<Transition>,
    /// Scene currently selected for editing/playback
    selected_scene: Option<SceneIndex>,
    /// Next index to assign; monotonic, never reused
    next_index: u32,
}

impl StoryGraph {
    /// Create a new empty graph
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            scenes: IndexMap::new(),
            transitions: Vec::new(),
            selected_scene: None,
            next_index: 1,
        }
    }

    /// Add a scene at the given canvas position, assigning the next unused
    /// index. The first scene added becomes the selected scene.
    pub fn add_scene(&mut self, position: [f32; 2]) -> SceneIndex {
        let index = SceneIndex(self.next_index);
        self.next_index += 1;
        self.scenes.insert(index, Scene::new(index, position));
        if self.selected_scene.is_none() {
            self.selected_scene = Some(index);
        }
        index
    }

    /// Remove a scene and, atomically, every transition incident to it.
    ///
    /// The removed [`Scene`] is returned so the caller can cascade-delete
    /// the externally owned scene bundle via its [`SceneId`].
    pub fn delete_scene(&mut self, index: SceneIndex) -> Result<Scene, GraphError> {
        let scene = self
            .scenes
            .swap_remove(&index)
            .ok_or(GraphError::SceneNotFound(index))?;
        self.transitions.retain(|t| !t.involves_scene(index));
        if self.selected_scene == Some(index) {
            self.selected_scene = self.scenes.keys().next().copied();
        }
        Ok(scene)
    }

    /// Get a scene by index
    pub fn find_scene(&self, index: SceneIndex) -> Option<&Scene> {
        self.scenes.get(&index)
    }

    /// Get a mutable scene by index
    pub fn find_scene_mut(&mut self, index: SceneIndex) -> Option<&mut Scene> {
        self.scenes.get_mut(&index)
    }

    /// Get a scene by its UUID
    pub fn scene_by_id(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.values().find(|s| s.id == id)
    }

    /// Set or clear a scene's title
    pub fn set_scene_title(
        &mut self,
        index: SceneIndex,
        title: Option<String>,
    ) -> Result<(), GraphError> {
        let scene = self
            .scenes
            .get_mut(&index)
            .ok_or(GraphError::SceneNotFound(index))?;
        scene.title = title;
        Ok(())
    }

    /// Get all scenes
    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    /// Get the number of scenes
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Scene currently selected for editing/playback
    pub fn selected_scene(&self) -> Option<SceneIndex> {
        self.selected_scene
    }

    /// Select a scene
    pub fn select_scene(&mut self, index: SceneIndex) -> Result<(), GraphError> {
        if !self.scenes.contains_key(&index) {
            return Err(GraphError::SceneNotFound(index));
        }
        self.selected_scene = Some(index);
        Ok(())
    }

    /// Add a transition between two scenes.
    ///
    /// Self-loops and duplicate `from -> to` edges are rejected as
    /// recoverable errors; the authoring layer surfaces them to the user.
    pub fn add_transition(
        &mut self,
        from: SceneIndex,
        to: SceneIndex,
        conditions: Vec<Condition>,
    ) -> Result<&Transition, GraphError> {
        if from == to {
            return Err(GraphError::SelfLoop(from));
        }
        if !self.scenes.contains_key(&from) {
            return Err(GraphError::SceneNotFound(from));
        }
        if !self.scenes.contains_key(&to) {
            return Err(GraphError::SceneNotFound(to));
        }
        if self.transitions.iter().any(|t| t.from == from && t.to == to) {
            return Err(GraphError::DuplicateTransition { from, to });
        }

        self.transitions.push(Transition::new(from, to, conditions));
        Ok(self.transitions.last().expect("just pushed"))
    }

    /// Remove the transition `from -> to`
    pub fn delete_transition(
        &mut self,
        from: SceneIndex,
        to: SceneIndex,
    ) -> Result<Transition, GraphError> {
        let pos = self
            .transitions
            .iter()
            .position(|t| t.from == from && t.to == to)
            .ok_or(GraphError::TransitionNotFound { from, to })?;
        Ok(self.transitions.remove(pos))
    }

    /// Get the transition `from -> to`, if present
    pub fn transition(&self, from: SceneIndex, to: SceneIndex) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|t| t.from == from && t.to == to)
    }

    /// Get all transitions in creation order
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    /// Transitions leaving a scene, in creation order
    pub fn transitions_from(&self, index: SceneIndex) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(move |t| t.from == index)
    }

    /// Transitions entering a scene
    pub fn transitions_to(&self, index: SceneIndex) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(move |t| t.to == index)
    }

    /// Scenes already reachable by one edge from `from`. The authoring layer
    /// uses this to filter connect targets, so duplicate edges are rarely
    /// attempted in the first place.
    pub fn connected_targets(&self, from: SceneIndex) -> Vec<SceneIndex> {
        self.transitions_from(from).map(|t| t.to).collect()
    }

    /// Get the number of transitions
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Resolve the transition to take out of `current`.
    ///
    /// Iterates the outgoing transitions in creation order and returns the
    /// target of the first one whose guard holds. First-match-wins: when
    /// several guards are simultaneously satisfied the earliest-authored
    /// edge takes precedence. No match means stay on the current scene.
    pub fn resolve_transition(
        &self,
        current: SceneIndex,
        state: &RuntimeState,
    ) -> Option<SceneIndex> {
        self.transitions_from(current)
            .find(|t| t.is_satisfied(state))
            .map(|t| t.to)
    }
}

impl Default for StoryGraph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when mutating or querying the story graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Scene not found
    #[error("Scene not found: {0}")]
    SceneNotFound(SceneIndex),

    /// Transition not found
    #[error("Transition not found: {from} -> {to}")]
    TransitionNotFound {
        /// Source scene index
        from: SceneIndex,
        /// Target scene index
        to: SceneIndex,
    },

    /// A transition between these scenes already exists
    #[error("Transition already exists: {from} -> {to}")]
    DuplicateTransition {
        /// Source scene index
        from: SceneIndex,
        /// Target scene index
        to: SceneIndex,
    },

    /// Self-loop not allowed
    #[error("Scene {0} cannot transition to itself")]
    SelfLoop(SceneIndex),
}
