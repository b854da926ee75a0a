// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene definitions for the story graph.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneId(pub Uuid);

impl SceneId {
    /// Create a new random scene ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SceneId {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable 1-based scene index.
///
/// Indices are assigned monotonically by [`crate::StoryGraph`] and never
/// reused, so a deleted scene's index stays invalid forever instead of
/// silently aliasing a later scene.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SceneIndex(pub u32);

impl std::fmt::Display for SceneIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A scene in the story graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Unique scene ID (keys the externally owned scene bundle)
    pub id: SceneId,
    /// Stable scene index
    pub index: SceneIndex,
    /// Display title (falls back to the index when unset)
    pub title: Option<String>,
    /// Position on the authoring canvas
    pub position: [f32; 2],
}

impl Scene {
    /// Create a new scene at the given canvas position
    pub fn new(index: SceneIndex, position: [f32; 2]) -> Self {
        Self {
            id: SceneId::new(),
            index,
            title: None,
            position,
        }
    }

    /// Display title, falling back to "Scene N"
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("Scene {}", self.index))
    }
}
