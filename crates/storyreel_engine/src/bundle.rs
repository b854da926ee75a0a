// SPDX-License-Identifier: MIT OR Apache-2.0
//! Persistence bundles: the units the engine mutates in memory and hands to
//! the store.
//!
//! A [`GameBundle`] holds the authored graph of one work; one
//! [`SceneBundle`] per scene holds that scene's footage list, interactive
//! nodes and playhead. Saves are fire-and-forget, last-write-wins; callers
//! serialize their own mutations (single-writer discipline).

use crate::media::{AssetError, AssetSource};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use storyreel_graph::{SceneId, StoryGraph};
use storyreel_timeline::{
    compose, ComposedTimeline, CompositionError, Footage, FootageId, MediaAssetRef, Node, NodeId,
    NodeKind, MIN_FOOTAGE_DURATION,
};
use uuid::Uuid;

/// Unique identifier for a work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub Uuid);

impl GameId {
    /// Create a new random game ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

/// One work's authored graph, as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameBundle {
    /// Unique work ID
    pub id: GameId,
    /// Scenes, transitions and selection
    pub graph: StoryGraph,
}

impl GameBundle {
    /// Create a new work
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: GameId::new(),
            graph: StoryGraph::new(title),
        }
    }

    /// Serialize to the RON bundle format
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Parse from the RON bundle format
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }
}

/// One scene's media and overlays, as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneBundle {
    /// Scene this bundle belongs to
    pub scene_id: SceneId,
    /// Owning work
    pub game_id: GameId,
    /// Clips in timeline order
    pub footages: Vec<Footage>,
    /// Interactive overlays
    pub nodes: Vec<Node>,
    /// Last playhead position within this scene
    pub current_time: Duration,
    /// Next node index to assign; monotonic, never reused
    next_node_index: u32,
}

impl SceneBundle {
    /// Create an empty bundle for a scene
    pub fn new(scene_id: SceneId, game_id: GameId) -> Self {
        Self {
            scene_id,
            game_id,
            footages: Vec::new(),
            nodes: Vec::new(),
            current_time: Duration::ZERO,
            next_node_index: 1,
        }
    }

    /// Import a video clip at the end of the timeline.
    ///
    /// The asset source is asked for the intrinsic duration, which becomes
    /// both the initial visible duration and the trim bound.
    pub fn import_video(
        &mut self,
        source: MediaAssetRef,
        assets: &dyn AssetSource,
    ) -> Result<FootageId, AssetError> {
        let probed = assets.probe(&source)?;
        let duration = probed
            .duration
            .ok_or_else(|| AssetError::NoDuration(source.handle.clone()))?;
        let footage = Footage::video(source, duration);
        let id = footage.id;
        self.footages.push(footage);
        Ok(id)
    }

    /// Import a still image shown for `duration`
    pub fn import_image(
        &mut self,
        source: MediaAssetRef,
        duration: Duration,
    ) -> Result<FootageId, CompositionError> {
        if duration < MIN_FOOTAGE_DURATION {
            return Err(CompositionError::TrimTooShort {
                requested: duration,
                minimum: MIN_FOOTAGE_DURATION,
            });
        }
        let footage = Footage::image(source, duration);
        let id = footage.id;
        self.footages.push(footage);
        Ok(id)
    }

    /// Remove a clip from the timeline
    pub fn remove_footage(&mut self, id: FootageId) -> Option<Footage> {
        let pos = self.footages.iter().position(|f| f.id == id)?;
        Some(self.footages.remove(pos))
    }

    /// Get a clip by ID
    pub fn footage(&self, id: FootageId) -> Option<&Footage> {
        self.footages.iter().find(|f| f.id == id)
    }

    /// Re-trim a clip; validation happens at this edit boundary
    pub fn trim_footage(
        &mut self,
        id: FootageId,
        left_mark: Duration,
        duration: Duration,
    ) -> Result<(), CompositionError> {
        let footage = self
            .footages
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(CompositionError::NoMedia)?;
        footage.trim(left_mark, duration)
    }

    /// Add an interactive node starting at `at`, assigning the next unused
    /// per-scene index
    pub fn add_node(&mut self, kind: NodeKind, at: Duration, duration: Duration) -> NodeId {
        let node = Node::new(self.next_node_index, kind, at, duration);
        self.next_node_index += 1;
        let id = node.id;
        self.nodes.push(node);
        id
    }

    /// Remove a node; footage entries are untouched
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let pos = self.nodes.iter().position(|n| n.id == id)?;
        Some(self.nodes.remove(pos))
    }

    /// Get a node by ID
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// UUIDs of all nodes, for sensor-scope bookkeeping
    pub fn node_uuids(&self) -> Vec<Uuid> {
        self.nodes.iter().map(|n| n.id.0).collect()
    }

    /// Compose this scene's footage list into a playable timeline
    pub fn compose(&self) -> ComposedTimeline {
        compose(&self.footages)
    }

    /// Serialize to the RON bundle format
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Parse from the RON bundle format
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::NullAssetSource;
    use storyreel_graph::SceneId;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn bundle() -> SceneBundle {
        SceneBundle::new(SceneId::new(), GameId::new())
    }

    #[test]
    fn test_import_video_probes_duration() {
        let mut scene = bundle();
        let id = scene
            .import_video(MediaAssetRef::video("asset://a", secs(7)), &NullAssetSource)
            .unwrap();
        let footage = scene.footage(id).unwrap();
        assert_eq!(footage.duration, secs(7));
        assert_eq!(footage.max_duration, secs(7));
    }

    #[test]
    fn test_import_video_without_duration_fails() {
        let mut scene = bundle();
        let err = scene
            .import_video(MediaAssetRef::image("asset://still"), &NullAssetSource)
            .unwrap_err();
        assert!(matches!(err, AssetError::NoDuration(_)));
        assert!(scene.footages.is_empty());
    }

    #[test]
    fn test_import_image_enforces_minimum() {
        let mut scene = bundle();
        let err = scene
            .import_image(MediaAssetRef::image("asset://still"), Duration::from_millis(10))
            .unwrap_err();
        assert!(matches!(err, CompositionError::TrimTooShort { .. }));
    }

    #[test]
    fn test_node_indices_are_stable() {
        let mut scene = bundle();
        let first = scene.add_node(NodeKind::Button, secs(0), secs(2));
        scene.add_node(NodeKind::Hotspot, secs(1), secs(2));
        scene.remove_node(first).unwrap();
        scene.add_node(NodeKind::Label, secs(2), secs(1));

        let indices: Vec<u32> = scene.nodes.iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![2, 3]);
    }

    #[test]
    fn test_trim_unknown_footage() {
        let mut scene = bundle();
        let err = scene
            .trim_footage(FootageId::new(), Duration::ZERO, secs(1))
            .unwrap_err();
        assert_eq!(err, CompositionError::NoMedia);
    }

    #[test]
    fn test_serialization() {
        let mut scene = bundle();
        scene
            .import_video(MediaAssetRef::video("asset://a", secs(3)), &NullAssetSource)
            .unwrap();
        scene.add_node(NodeKind::Button, secs(1), secs(2));
        scene.current_time = Duration::from_millis(1500);

        let ron_str = scene.to_ron().unwrap();
        let loaded = SceneBundle::from_ron(&ron_str).unwrap();
        assert_eq!(loaded.footages.len(), 1);
        assert_eq!(loaded.nodes.len(), 1);
        assert_eq!(loaded.current_time, Duration::from_millis(1500));
        // The index counter survives the round trip
        assert_eq!(loaded.next_node_index, 2);
    }

    #[test]
    fn test_game_bundle_serialization() {
        let mut game = GameBundle::new("Round Trip");
        game.graph.add_scene([0.0, 0.0]);

        let ron_str = game.to_ron().unwrap();
        let loaded = GameBundle::from_ron(&ron_str).unwrap();
        assert_eq!(loaded.id, game.id);
        assert_eq!(loaded.graph.scene_count(), 1);
    }
}
